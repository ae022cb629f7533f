use std::sync::{Arc, Mutex};

use tapkit_theme::decode::color::to_hex;
use tapkit_theme::prelude::*;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum CardField {
    TextColor,
    Font,
    BackgroundColor,
    BarStyle,
}

#[derive(Default)]
struct CardNumberField {
    text_color: Option<String>,
    background_color: Option<String>,
    font: Option<FontDescriptor>,
    bar_style: Option<BarStyle>,
    batches: usize,
}

impl Themeable for CardNumberField {
    type Attribute = CardField;

    fn apply(&mut self, attribute: &CardField, value: ThemeValue) {
        match (attribute, value) {
            (CardField::TextColor, ThemeValue::Color(color)) => self.text_color = Some(to_hex(color)),
            (CardField::BackgroundColor, ThemeValue::Color(color)) => {
                self.background_color = Some(to_hex(color))
            },
            (CardField::Font, ThemeValue::Font(font)) => self.font = Some(font),
            (CardField::BarStyle, ThemeValue::BarStyle(style)) => self.bar_style = Some(style),
            (attribute, value) => panic!("unexpected {:?} for {:?}", value.kind(), attribute),
        }
    }

    fn transition(&mut self, _duration: std::time::Duration, updates: impl FnOnce(&mut Self)) {
        self.batches += 1;
        updates(self);
    }
}

fn light() -> ThemeDocument {
    ThemeDocument::new()
        .with("Global", ThemeDocument::new().with("Colors", ThemeDocument::new().with("brand", "#336699")))
        .with(
            "cardNumberTextField",
            ThemeDocument::new()
                .with("textColor", "brand")
                .with("backgroundColor", "#ffffff")
                .with("font", "Roboto-Bold,14")
                .with("barStyle", "default"),
        )
}

fn dark() -> ThemeDocument {
    ThemeDocument::new().with(
        "cardNumberTextField",
        ThemeDocument::new()
            .with("textColor", "#eeeeee")
            .with("backgroundColor", "#000000")
            .with("font", "Roboto-Regular,14")
            .with("barStyle", "UIBarStyle.black"),
    )
}

fn bind_all(bindings: &ThemeBindings<CardNumberField>) {
    bindings.register_binding(CardField::TextColor, Selector::color("cardNumberTextField.textColor"));
    bindings.register_binding(
        CardField::BackgroundColor,
        Selector::color("cardNumberTextField.backgroundColor"),
    );
    bindings.register_binding(CardField::Font, Selector::font("cardNumberTextField.font"));
    bindings.register_binding(
        CardField::BarStyle,
        Selector::key_path(SelectorKind::BarStyle, "cardNumberTextField.barStyle"),
    );
}

#[test]
fn test_palette_name_resolves_through_global_colors() {
    let registry = ThemeRegistry::new();
    registry.set_theme(light());

    let value = Selector::color("cardNumberTextField.textColor").value(&registry);
    assert_eq!(value.and_then(|v| v.as_color()).map(to_hex).as_deref(), Some("#336699"));
}

#[test]
fn test_arabic_locale_swaps_font_family() {
    let registry = ThemeRegistry::new();
    registry.set_theme(light());
    let selector = Selector::font("cardNumberTextField.font");

    let family = |registry: &ThemeRegistry| {
        selector
            .value(registry)
            .and_then(|v| v.as_font().and_then(|f| f.family().map(str::to_string)))
    };

    assert_eq!(family(&registry).as_deref(), Some("Roboto-Bold"));
    registry.update_environment(|environment| environment.locale = "ar".to_string());
    assert_eq!(family(&registry).as_deref(), Some("Tajawal-Black"));
}

#[test]
fn test_appearance_flip_rethemes_bound_fields() {
    let registry = ThemeRegistry::new();
    registry.set_light_dark_themes(light(), dark());

    let field = ThemeBindings::new(&registry, CardNumberField::default());
    bind_all(&field);

    field.with_target(|f| {
        assert_eq!(f.text_color.as_deref(), Some("#336699"));
        assert_eq!(f.bar_style, Some(BarStyle::Default));
        assert_eq!(f.batches, 0);
    });

    registry.notify_appearance_changed(Appearance::Dark);
    field.with_target(|f| {
        assert_eq!(f.text_color.as_deref(), Some("#eeeeee"));
        assert_eq!(f.background_color.as_deref(), Some("#000000"));
        assert_eq!(f.font.as_ref().and_then(|f| f.family()), Some("Roboto-Regular"));
        assert_eq!(f.bar_style, Some(BarStyle::Black));
        assert_eq!(f.batches, 1);
    });

    registry.notify_appearance_changed(Appearance::Dark);
    assert_eq!(field.with_target(|f| f.batches), 1);
}

#[test]
fn test_removed_binding_is_not_reapplied() {
    let registry = ThemeRegistry::new();
    registry.set_theme(light());

    let field = ThemeBindings::new(&registry, CardNumberField::default());
    bind_all(&field);
    field.remove_binding(&CardField::BackgroundColor);

    registry.set_theme(dark());
    field.with_target(|f| {
        assert_eq!(f.background_color.as_deref(), Some("#ffffff"));
        assert_eq!(f.text_color.as_deref(), Some("#eeeeee"));
    });
    assert!(field.is_subscribed());
    assert!(field.current_value(&CardField::BackgroundColor).is_none());
}

#[test]
fn test_absent_value_keeps_binding() {
    let registry = ThemeRegistry::new();
    registry.set_theme(light());
    let field = ThemeBindings::new(&registry, CardNumberField::default());
    bind_all(&field);

    registry.set_theme(ThemeDocument::new());
    field.with_target(|f| assert_eq!(f.text_color.as_deref(), Some("#336699")));
    assert_eq!(field.len(), 4);

    registry.set_theme(dark());
    field.with_target(|f| assert_eq!(f.text_color.as_deref(), Some("#eeeeee")));
}

#[test]
fn test_list_selector_and_theme_index() {
    let registry = ThemeRegistry::new();
    let field = ThemeBindings::new(&registry, CardNumberField::default());
    field.register_binding(CardField::TextColor, Selector::list(SelectorKind::Color, ["#111111", "#222222"]));

    assert_eq!(field.with_target(|f| f.text_color.clone()).as_deref(), Some("#111111"));
    registry.set_theme_index(1);
    assert_eq!(field.with_target(|f| f.text_color.clone()).as_deref(), Some("#222222"));
    registry.set_theme_index(7);
    assert_eq!(field.with_target(|f| f.text_color.clone()).as_deref(), Some("#222222"));
}

struct Switcher {
    registry: ThemeRegistry,
    seen: Mutex<Vec<usize>>,
}

impl ThemeObserver for Switcher {
    fn theme_changed(&self, registry: &ThemeRegistry) {
        let index = registry.theme_index();
        self.seen.lock().unwrap().push(index);
        if index == 1 {
            self.registry.set_theme_index(2);
        }
    }
}

#[test]
fn test_observer_may_call_back_into_registry() {
    let registry = ThemeRegistry::new();
    let switcher = Arc::new(Switcher {
        registry: registry.clone(),
        seen: Mutex::new(Vec::new()),
    });
    registry.subscribe(Arc::downgrade(&switcher) as std::sync::Weak<dyn ThemeObserver>);

    registry.set_theme_index(1);
    assert_eq!(registry.theme_index(), 2);
    assert_eq!(*switcher.seen.lock().unwrap(), vec![1, 2]);
}

#[test]
fn test_concurrent_mutations_are_serialised() {
    let registry = ThemeRegistry::new();
    let field = ThemeBindings::new(&registry, CardNumberField::default());
    field.register_binding(CardField::TextColor, Selector::list(SelectorKind::Color, ["#111111", "#222222"]));

    let handles: Vec<_> = (0..4)
        .map(|i| {
            let registry = registry.clone();
            std::thread::spawn(move || {
                for _ in 0..25 {
                    registry.set_theme_index(i % 2);
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(registry.broadcast_count(), 100);
    assert_eq!(field.with_target(|f| f.batches), 100);
}

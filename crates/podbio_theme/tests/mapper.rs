use podbio_theme::{
    convert, convert_in, BorderWidth, CornerShape, GlowIntensity, MapCategory, ShadowIntensity,
    SpacingDensity,
};

#[test]
fn every_declared_enum_value_has_a_mapping() {
    let mut checked = 0;
    for value in BorderWidth::ALL {
        assert!(convert_in(MapCategory::BorderWidth, value.as_str()).is_ok(), "{value}");
        checked += 1;
    }
    for value in ShadowIntensity::ALL {
        assert!(convert_in(MapCategory::Shadow, value.as_str()).is_ok(), "{value}");
        checked += 1;
    }
    for value in GlowIntensity::ALL {
        assert!(convert_in(MapCategory::GlowBlur, value.as_str()).is_ok(), "{value}");
        assert!(convert_in(MapCategory::GlowOpacity, value.as_str()).is_ok(), "{value}");
        checked += 2;
    }
    for value in SpacingDensity::ALL {
        assert!(convert_in(MapCategory::Spacing, value.as_str()).is_ok(), "{value}");
        checked += 1;
    }
    for value in CornerShape::ALL {
        assert!(convert_in(MapCategory::CornerShape, value.as_str()).is_ok(), "{value}");
        checked += 1;
    }
    assert_eq!(checked, 16);
}

#[test]
fn mapped_values_are_never_empty() {
    for category in MapCategory::ALL {
        for value in ["thin", "medium", "thick", "subtle", "strong", "pronounced", "compact",
            "comfortable", "spacious", "square", "rounded", "pill"]
        {
            if let Ok(out) = convert_in(category, value) {
                assert!(!out.is_empty(), "{value} in {category}");
            }
        }
    }
}

#[test]
fn glow_examples() {
    assert_eq!(convert("pronounced", "glow_blur").unwrap(), "16px");
    assert_eq!(convert("subtle", "glow_opacity").unwrap(), "0.5");
}

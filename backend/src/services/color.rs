//! Wave category to fill color.

/// Fill color for regions whose category is unknown or missing.
pub const DEFAULT_COLOR: &str = "#eee";

/// Color for an already lower-cased wave category.
pub fn color_for(category: &str) -> &'static str {
    match category {
        "tenang" => "#4ba3f4",
        "rendah" => "#2b964b",
        "sedang" => "#Ffe000",
        "tinggi" => "#fd8436",
        "sangat tinggi" => "#c32b01",
        "ekstrim" => "#ef38ce",
        _ => DEFAULT_COLOR,
    }
}

/// Lower-cases `category` and looks up its color.
pub fn fill_color(category: &str) -> &'static str {
    color_for(&category.to_lowercase())
}

//! Weapon price generation.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use rand::Rng;

/// Prices are always rounded to this step.
pub const PRICE_STEP: u32 = 50;

/// Inclusive price range for a weapon category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PriceRange {
    pub min: u32,
    pub max: u32,
}

impl PriceRange {
    /// Build a range; bounds are swapped if given in the wrong order.
    pub const fn new(min: u32, max: u32) -> Self {
        if min <= max {
            Self { min, max }
        } else {
            Self { min: max, max: min }
        }
    }

    /// Whether `price` lies inside the range.
    pub fn contains(&self, price: u32) -> bool {
        (self.min..=self.max).contains(&price)
    }
}

/// Range used for categories missing from the table.
pub const DEFAULT_RANGE: PriceRange = PriceRange::new(500, 1500);

static CATEGORY_PRICES: Lazy<HashMap<&'static str, PriceRange>> = Lazy::new(|| {
    HashMap::from([
        ("csgo_inventory_weapon_category_pistols", PriceRange::new(200, 700)),
        ("csgo_inventory_weapon_category_smgs", PriceRange::new(1000, 1500)),
        ("csgo_inventory_weapon_category_rifles", PriceRange::new(1500, 3500)),
        ("csgo_inventory_weapon_category_heavy", PriceRange::new(1200, 3000)),
        ("sfui_invpanel_filter_melee", PriceRange::new(200, 1000)),
        ("sfui_invpanel_filter_gloves", PriceRange::new(200, 1000)),
    ])
});

/// Price range for a category id.
pub fn price_range(category_id: &str) -> PriceRange {
    CATEGORY_PRICES
        .get(category_id)
        .copied()
        .unwrap_or(DEFAULT_RANGE)
}

/// Round `num` to the nearest multiple of `multiple`; exact halves round up.
///
/// `round_to_nearest_multiple(145, 50)` is `150`. Multiples below 2 leave the
/// number unchanged.
pub fn round_to_nearest_multiple(num: u32, multiple: u32) -> u32 {
    if multiple < 2 || num % multiple == 0 {
        return num;
    }
    let shifted = num + multiple / 2;
    shifted - shifted % multiple
}

/// Draw a price for a weapon in `range`.
///
/// The draw is uniform over the range, then rounded to [`PRICE_STEP`] and
/// clamped back into the range in case rounding overshoots an unaligned bound.
pub fn generate_price<R: Rng + ?Sized>(range: PriceRange, rng: &mut R) -> u32 {
    let raw = rng.gen_range(range.min..=range.max);
    let rounded = round_to_nearest_multiple(raw, PRICE_STEP);
    if range.contains(rounded) {
        rounded
    } else if rounded > range.max {
        rounded - PRICE_STEP
    } else {
        rounded + PRICE_STEP
    }
}

//! Registration-export column tables and rank orderings.
//!
//! Adding a division is an edit to these tables only; nothing else in the
//! crate branches on division names.

/// Source column holding the male gender indicator.
pub const C_COL_GENDER_MALE: &str = "Gender: Male";
/// Source column holding the female gender indicator.
pub const C_COL_GENDER_FEMALE: &str = "Gender: Female";
/// Merged gender column produced by normalization.
pub const C_COL_GENDER: &str = "Gender";
/// Fine-grained belt rank column.
pub const C_COL_BELT: &str = "Belt Level";
/// Weight column, pounds.
pub const C_COL_WEIGHT: &str = "Weight (in total lbs)";
/// Height column, inches.
pub const C_COL_HEIGHT: &str = "Height (in total inches)";

/// Gender written when neither indicator is set.
// Kept for parity with existing exports; rows carrying it land in no bucket.
pub const C_GENDER_MISSING: &str = "nan";

/// Columns kept on every per-division table.
pub const TUP_PRIMARY_HEADERS: [&str; 7] = [
    "Participant's Name: First",
    "Participant's Name: Last",
    "EMA Location Participant is From",
    C_COL_HEIGHT,
    C_COL_WEIGHT,
    C_COL_BELT,
    C_COL_GENDER,
];

/// Standard divisions: source membership column -> division name.
pub const TUP_DIVISION_HEADERS: [(&str, &str); 4] = [
    ("Division Entering:: Forms", "Forms"),
    ("Division Entering:: Weapons", "Weapons"),
    ("Division Entering:: Grappling", "Grappling"),
    ("Division Entering:: Sparring", "Sparring"),
];

/// Bonus divisions: source membership column -> division name.
pub const TUP_EXTRA_DIVISION_HEADERS: [(&str, &str); 2] = [
    (
        "Extra Divisions:: Team Forms - 12 Years and Under Only (Bonus Division) +$10",
        "Team Forms",
    ),
    (
        "Extra Divisions:: Musical Weapons - All Ages (Bonus Division) +$10 (modified)",
        "Musical Weapons",
    ),
];

/// Extra per-row fields carried only on one division's table.
pub const TUP_CUSTOM_DIVISION_HEADERS: [(&str, &[&str]); 1] = [(
    "Extra Divisions:: Team Forms - 12 Years and Under Only (Bonus Division) +$10",
    &["Teammates Names for Team Forms"],
)];

/// Belt ranks in competitive order, White to Black.
pub const TUP_BELT_LEVELS: [&str; 19] = [
    "White",
    "White Belt Black Stripe",
    "Yellow",
    "Yellow Belt Black Stripe",
    "Orange",
    "Orange Belt Black Stripe",
    "Green",
    "Green Belt Black Stripe",
    "Blue",
    "Blue Belt Black Stripe",
    "Purple",
    "Purple Belt Black Stripe",
    "Red",
    "Red Belt Black Stripe",
    "Brown",
    "Brown Belt Blue Stripe",
    "Brown Belt Red Stripe",
    "Brown Belt Black Stripe",
    "Black",
];

/// Coarse belt buckets; a rank belongs to the bucket its name starts with.
pub const TUP_BELT_DIVISIONS: [&str; 9] = [
    "White", "Yellow", "Orange", "Green", "Blue", "Purple", "Red", "Brown", "Black",
];

//! Greek cardinal numerals for receipt amounts, in capitals without accents as receipts are
//! printed.
//!
//! A number is split into a thousands group and a remainder, each in `1..=999` and built
//! from the lookup tables below. Thousands are counted with the feminine noun ΧΙΛΙΑΔΕΣ, so
//! the multiplier group takes feminine forms (ΜΙΑ, ΤΡΕΙΣ, ΤΕΣΣΕΡΙΣ, ΔΙΑΚΟΣΙΕΣ…), while
//! a group that is itself the number uses the neuter counting forms. Exactly one thousand
//! is the single word ΧΙΛΙΑ.
//!
//! Inside a group, ΚΑΙ joins a tens word to a nonzero units word (ΕΙΚΟΣΙ ΚΑΙ ΕΝΑ) and
//! nowhere else. ΕΚΑΤΟ becomes ΕΚΑΤΟΝ when anything follows it in the same group.

use thiserror::Error;

/// Largest amount a receipt may carry, and therefore the largest number spelled out.
pub const MAX_WORDS: i64 = 199_999;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("{value} is outside the spellable range 0..={MAX_WORDS}")]
pub struct OutOfRangeError {
    pub value: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Form {
    /// The group is the number itself (neuter).
    Standalone,
    /// The group counts ΧΙΛΙΑΔΕΣ (feminine agreement).
    Multiplier,
}

const ZERO: &str = "ΜΗΔΕΝ";
const CONJUNCTION: &str = "ΚΑΙ";
const ONE_THOUSAND: &str = "ΧΙΛΙΑ";
const THOUSANDS: &str = "ΧΙΛΙΑΔΕΣ";
const HUNDRED_LINKED: &str = "ΕΚΑΤΟΝ";

#[rustfmt::skip]
const UNITS: [&str; 10] = [
    "", "ΕΝΑ", "ΔΥΟ", "ΤΡΙΑ", "ΤΕΣΣΕΡΑ", "ΠΕΝΤΕ", "ΕΞΙ", "ΕΠΤΑ", "ΟΚΤΩ", "ΕΝΝΕΑ",
];
#[rustfmt::skip]
const UNITS_FEMININE: [&str; 10] = [
    "", "ΜΙΑ", "ΔΥΟ", "ΤΡΕΙΣ", "ΤΕΣΣΕΡΙΣ", "ΠΕΝΤΕ", "ΕΞΙ", "ΕΠΤΑ", "ΟΚΤΩ", "ΕΝΝΕΑ",
];
#[rustfmt::skip]
const TEENS: [&str; 10] = [
    "ΔΕΚΑ", "ΕΝΤΕΚΑ", "ΔΩΔΕΚΑ", "ΔΕΚΑΤΡΙΑ", "ΔΕΚΑΤΕΣΣΕΡΑ",
    "ΔΕΚΑΠΕΝΤΕ", "ΔΕΚΑΕΞΙ", "ΔΕΚΑΕΠΤΑ", "ΔΕΚΑΟΚΤΩ", "ΔΕΚΑΕΝΝΕΑ",
];
#[rustfmt::skip]
const TEENS_FEMININE: [&str; 10] = [
    "ΔΕΚΑ", "ΕΝΤΕΚΑ", "ΔΩΔΕΚΑ", "ΔΕΚΑΤΡΕΙΣ", "ΔΕΚΑΤΕΣΣΕΡΙΣ",
    "ΔΕΚΑΠΕΝΤΕ", "ΔΕΚΑΕΞΙ", "ΔΕΚΑΕΠΤΑ", "ΔΕΚΑΟΚΤΩ", "ΔΕΚΑΕΝΝΕΑ",
];
#[rustfmt::skip]
const TENS: [&str; 10] = [
    "", "", "ΕΙΚΟΣΙ", "ΤΡΙΑΝΤΑ", "ΣΑΡΑΝΤΑ", "ΠΕΝΗΝΤΑ", "ΕΞΗΝΤΑ", "ΕΒΔΟΜΗΝΤΑ", "ΟΓΔΟΝΤΑ", "ΕΝΕΝΗΝΤΑ",
];
#[rustfmt::skip]
const HUNDREDS: [&str; 10] = [
    "", "ΕΚΑΤΟ", "ΔΙΑΚΟΣΙΑ", "ΤΡΙΑΚΟΣΙΑ", "ΤΕΤΡΑΚΟΣΙΑ",
    "ΠΕΝΤΑΚΟΣΙΑ", "ΕΞΑΚΟΣΙΑ", "ΕΠΤΑΚΟΣΙΑ", "ΟΚΤΑΚΟΣΙΑ", "ΕΝΝΙΑΚΟΣΙΑ",
];
#[rustfmt::skip]
const HUNDREDS_FEMININE: [&str; 10] = [
    "", "ΕΚΑΤΟ", "ΔΙΑΚΟΣΙΕΣ", "ΤΡΙΑΚΟΣΙΕΣ", "ΤΕΤΡΑΚΟΣΙΕΣ",
    "ΠΕΝΤΑΚΟΣΙΕΣ", "ΕΞΑΚΟΣΙΕΣ", "ΕΠΤΑΚΟΣΙΕΣ", "ΟΚΤΑΚΟΣΙΕΣ", "ΕΝΝΙΑΚΟΣΙΕΣ",
];

/// Spells out `n` for `0 <= n <= MAX_WORDS`.
pub fn words(n: i64) -> Result<String, OutOfRangeError> {
    if !(0..=MAX_WORDS).contains(&n) {
        return Err(OutOfRangeError { value: n });
    }
    if n == 0 {
        return Ok(ZERO.to_string());
    }

    let n = n as u32;
    let thousands = n / 1000;
    let rest = n % 1000;

    let mut parts: Vec<&'static str> = Vec::new();
    match thousands {
        0 => {}
        1 => parts.push(ONE_THOUSAND),
        _ => {
            parts.extend(group(thousands, Form::Multiplier));
            parts.push(THOUSANDS);
        }
    }
    if rest > 0 {
        parts.extend(group(rest, Form::Standalone));
    }
    Ok(parts.join(" "))
}

/// Words for a group in `1..=999`. Zero digits never produce a word.
fn group(n: u32, form: Form) -> Vec<&'static str> {
    debug_assert!((1..=999).contains(&n));
    let (units, teens, hundreds) = match form {
        Form::Standalone => (&UNITS, &TEENS, &HUNDREDS),
        Form::Multiplier => (&UNITS_FEMININE, &TEENS_FEMININE, &HUNDREDS_FEMININE),
    };

    let h = (n / 100) as usize;
    let below_hundred = n % 100;
    let t = (below_hundred / 10) as usize;
    let u = (below_hundred % 10) as usize;

    let mut out = Vec::with_capacity(4);
    if h == 1 && below_hundred > 0 {
        out.push(HUNDRED_LINKED);
    } else if h > 0 {
        out.push(hundreds[h]);
    }

    if t == 1 {
        out.push(teens[u]);
    } else {
        if t >= 2 {
            out.push(TENS[t]);
        }
        if u > 0 {
            if t >= 2 {
                out.push(CONJUNCTION);
            }
            out.push(units[u]);
        }
    }
    out
}

// ────────────────────────────────────────────────────────────────────────────
// Written amount
// ────────────────────────────────────────────────────────────────────────────

const CURRENCY_WORD: &str = "ΕΥΡΟ";
const AMOUNT_CONJUNCTION: &str = "ΚΑΙ";
const CENT_WORD: &str = "ΣΕΝΤ";
const ONLY_WORD: &str = "ΜΟΝΟ";

/// The words-only rendering of an amount, e.g. `ΕΥΡΟ ΔΕΚΑ ΚΑΙ ΠΕΝΗΝΤΑ ΣΕΝΤ ΜΟΝΟ`.
/// The cents clause is present only when cents are nonzero.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrittenAmount(String);

impl WrittenAmount {
    pub fn new(major: u32, minor: u8) -> Result<Self, OutOfRangeError> {
        let mut text = format!("{CURRENCY_WORD} {}", words(i64::from(major))?);
        if minor > 0 {
            text.push_str(&format!(
                " {AMOUNT_CONJUNCTION} {} {CENT_WORD}",
                words(i64::from(minor))?
            ));
        }
        text.push(' ');
        text.push_str(ONLY_WORD);
        Ok(Self(text))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for WrittenAmount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

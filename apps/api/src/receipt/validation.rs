//! Receipt form validation.
//!
//! Numeric fields are checked in a fixed order (amount, cents, receipt number, copies) and
//! the first failure wins. Nothing here touches the filesystem, so a rejected form never
//! leaves a partial write behind.

use thiserror::Error;

use crate::receipt::models::{PaymentMethod, ReceiptData, ReceiptForm};
use crate::receipt::naming::find_forbidden;
use crate::receipt::words::MAX_WORDS;

pub const MAX_CENTS: i64 = 99;

/// User-facing validation failures. Messages are shown verbatim to the person filling the
/// form.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReceiptError {
    #[error("Παρακαλώ εισάγετε έγκυρο αριθμό για το ποσό.")]
    InvalidAmount,

    #[error("Το ποσό είναι υπερβολικά μεγάλο.")]
    AmountOutOfRange,

    #[error("Παρακαλώ εισάγετε έγκυρο αριθμό για τα σεντ.")]
    InvalidCents,

    #[error("Τα σεντ δεν μπορούν να είναι πάνω από 99.")]
    CentsOutOfRange,

    #[error("Παρακαλώ εισάγετε έγκυρο αριθμό για τον αριθμό απόδειξης.")]
    InvalidReceiptNumber,

    #[error("Ο αριθμός αντιγράφων πρέπει να είναι θετικός αριθμός.")]
    InvalidCopies,

    #[error("Παρακαλώ εισάγετε από ποιον εισπράχθηκε το ποσό.")]
    EmptyPayer,

    #[error("Ο χαρακτήρας '{ch}' δεν επιτρέπεται στα ονόματα αρχείων ({field}).")]
    ForbiddenCharacter { field: &'static str, ch: char },
}

impl ReceiptError {
    /// Stable machine-readable code for API clients.
    pub fn code(&self) -> &'static str {
        match self {
            ReceiptError::InvalidAmount => "INVALID_AMOUNT",
            ReceiptError::AmountOutOfRange => "AMOUNT_OUT_OF_RANGE",
            ReceiptError::InvalidCents => "INVALID_CENTS",
            ReceiptError::CentsOutOfRange => "CENTS_OUT_OF_RANGE",
            ReceiptError::InvalidReceiptNumber => "INVALID_RECEIPT_NUMBER",
            ReceiptError::InvalidCopies => "INVALID_COPIES",
            ReceiptError::EmptyPayer => "EMPTY_PAYER",
            ReceiptError::ForbiddenCharacter { .. } => "FORBIDDEN_CHARACTER",
        }
    }

    /// The form field the error refers to.
    pub fn field(&self) -> &'static str {
        match self {
            ReceiptError::InvalidAmount | ReceiptError::AmountOutOfRange => "amount",
            ReceiptError::InvalidCents | ReceiptError::CentsOutOfRange => "cents",
            ReceiptError::InvalidReceiptNumber => "receipt_number",
            ReceiptError::InvalidCopies => "copies",
            ReceiptError::EmptyPayer => "received_from",
            ReceiptError::ForbiddenCharacter { field, .. } => *field,
        }
    }
}

/// Parses and checks a submitted form.
///
/// `default_copies` applies when the form omits `copies`; `today` supplies the date when
/// the form leaves it blank.
pub fn validate_form(
    form: &ReceiptForm,
    default_copies: u32,
    today: impl FnOnce() -> String,
) -> Result<ReceiptData, ReceiptError> {
    let amount_major = parse_bounded(&form.amount, MAX_WORDS)
        .map_err(|e| e.into_error(ReceiptError::InvalidAmount, ReceiptError::AmountOutOfRange))?;
    let amount_minor = parse_bounded(&form.cents, MAX_CENTS)
        .map_err(|e| e.into_error(ReceiptError::InvalidCents, ReceiptError::CentsOutOfRange))?;
    let receipt_number = parse_receipt_number(&form.receipt_number)?;
    let copies = match &form.copies {
        Some(raw) => parse_copies(raw)?,
        None => default_copies,
    };

    let received_from = form.received_from.trim();
    if received_from.is_empty() {
        return Err(ReceiptError::EmptyPayer);
    }
    if let Some(ch) = find_forbidden(received_from) {
        return Err(ReceiptError::ForbiddenCharacter {
            field: "received_from",
            ch,
        });
    }

    let payment_method = PaymentMethod::canonicalize(&form.payment_method);
    let check_number = if payment_method.is_cheque() {
        let number = form.check_number.trim();
        if let Some(ch) = find_forbidden(number) {
            return Err(ReceiptError::ForbiddenCharacter {
                field: "check_number",
                ch,
            });
        }
        (!number.is_empty()).then(|| number.to_string())
    } else {
        None
    };

    let date_text = match form.date.as_deref().map(str::trim) {
        Some(date) if !date.is_empty() => date.to_string(),
        _ => today(),
    };

    Ok(ReceiptData {
        received_from: received_from.to_string(),
        // Bounds checked above; both fit.
        amount_major: amount_major as u32,
        amount_minor: amount_minor as u8,
        date_text,
        receipt_number,
        payment_method,
        check_number,
        notes: form.notes.trim().to_string(),
        copies,
    })
}

enum BoundedError {
    NotANumber,
    TooLarge,
}

impl BoundedError {
    fn into_error(self, invalid: ReceiptError, too_large: ReceiptError) -> ReceiptError {
        match self {
            BoundedError::NotANumber => invalid,
            BoundedError::TooLarge => too_large,
        }
    }
}

/// Integer in `0..=max`. Negative values are not numbers a receipt can carry.
fn parse_bounded(raw: &str, max: i64) -> Result<i64, BoundedError> {
    let value: i64 = raw.trim().parse().map_err(|_| BoundedError::NotANumber)?;
    if value < 0 {
        Err(BoundedError::NotANumber)
    } else if value > max {
        Err(BoundedError::TooLarge)
    } else {
        Ok(value)
    }
}

fn parse_receipt_number(raw: &str) -> Result<u64, ReceiptError> {
    match raw.trim().parse::<u64>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(ReceiptError::InvalidReceiptNumber),
    }
}

/// Digits only (no sign), at least one copy.
fn parse_copies(raw: &str) -> Result<u32, ReceiptError> {
    let raw = raw.trim();
    if raw.is_empty() || !raw.chars().all(|c| c.is_ascii_digit()) {
        return Err(ReceiptError::InvalidCopies);
    }
    match raw.parse::<u32>() {
        Ok(n) if n >= 1 => Ok(n),
        _ => Err(ReceiptError::InvalidCopies),
    }
}

use serde::{Deserialize, Serialize};

// ────────────────────────────────────────────────────────────────────────────
// Raw form input
// ────────────────────────────────────────────────────────────────────────────

/// The receipt form exactly as submitted: every numeric field is still text.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReceiptForm {
    pub received_from: String,
    pub amount: String,
    #[serde(default = "default_cents")]
    pub cents: String,
    /// Pre-formatted date. Missing or blank means today.
    #[serde(default)]
    pub date: Option<String>,
    pub receipt_number: String,
    #[serde(default = "default_payment_method")]
    pub payment_method: String,
    #[serde(default)]
    pub check_number: String,
    #[serde(default)]
    pub notes: String,
    /// Missing means the configured default.
    #[serde(default)]
    pub copies: Option<String>,
}

fn default_cents() -> String {
    "00".to_string()
}

fn default_payment_method() -> String {
    PaymentMethod::BankTransfer.label().to_string()
}

// ────────────────────────────────────────────────────────────────────────────
// Payment method
// ────────────────────────────────────────────────────────────────────────────

/// Payment methods the form offers, plus whatever else the user typed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "label", rename_all = "snake_case")]
pub enum PaymentMethod {
    Cash,
    Cheque,
    BankTransfer,
    Other(String),
}

impl PaymentMethod {
    /// Maps free text onto a variant, ignoring case, surrounding whitespace and Greek accents.
    pub fn canonicalize(raw: &str) -> Self {
        let folded = fold_greek(raw.trim());
        match folded.as_str() {
            "μετρητα" | "cash" => PaymentMethod::Cash,
            "επιταγη" | "cheque" | "check" => PaymentMethod::Cheque,
            "εμβασμα" | "bank transfer" | "transfer" => PaymentMethod::BankTransfer,
            _ => PaymentMethod::Other(raw.trim().to_string()),
        }
    }

    /// The text printed on the receipt.
    pub fn label(&self) -> &str {
        match self {
            PaymentMethod::Cash => "Μετρητά",
            PaymentMethod::Cheque => "Επιταγή",
            PaymentMethod::BankTransfer => "Έμβασμα",
            PaymentMethod::Other(label) => label,
        }
    }

    pub fn is_cheque(&self) -> bool {
        matches!(self, PaymentMethod::Cheque)
    }
}

/// Lowercases and strips tonos / dialytika from Greek vowels.
fn fold_greek(s: &str) -> String {
    s.chars()
        .flat_map(char::to_lowercase)
        .map(|c| match c {
            'ά' => 'α',
            'έ' => 'ε',
            'ή' => 'η',
            'ί' | 'ϊ' | 'ΐ' => 'ι',
            'ό' => 'ο',
            'ύ' | 'ϋ' | 'ΰ' => 'υ',
            'ώ' => 'ω',
            other => other,
        })
        .collect()
}

// ────────────────────────────────────────────────────────────────────────────
// Validated receipt
// ────────────────────────────────────────────────────────────────────────────

/// A validated receipt, immutable for one generation run.
///
/// `check_number` is `Some` only when the method is a cheque and a number was given.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReceiptData {
    pub received_from: String,
    pub amount_major: u32,
    pub amount_minor: u8,
    pub date_text: String,
    pub receipt_number: u64,
    pub payment_method: PaymentMethod,
    pub check_number: Option<String>,
    pub notes: String,
    pub copies: u32,
}

impl ReceiptData {
    /// `€1500,05`: decimal comma, cents always two digits.
    pub fn amount_display(&self) -> String {
        format!("€{},{:02}", self.amount_major, self.amount_minor)
    }
}

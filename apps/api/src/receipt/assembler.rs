//! Receipt generation pipeline.
//!
//! # Steps
//! 1. Validate the raw form (no side effects on failure).
//! 2. Spell out the amount and build the ordered field list; the cheque-number row is
//!    present only for cheques that carry a number.
//! 3. Compose the layout plan and hand it to the renderer.
//! 4. Commit the receipt number to the sequence counter, only once rendering succeeded.
//! 5. Dispatch printing. A print failure is logged and reported, never propagated.
//!
//! Steps 2–4 run under one async mutex inside `spawn_blocking`, so concurrent requests
//! cannot interleave their counter read and write.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use serde::Serialize;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::errors::AppError;
use crate::layout::{FieldSpec, PageConfig, PageLayoutComposer, TextMeasure, TrailerText};
use crate::printing::{PrintDispatcher, PrintError, PrintJob};
use crate::receipt::models::{ReceiptData, ReceiptForm};
use crate::receipt::naming::document_file_name;
use crate::receipt::sequence::ReceiptCounter;
use crate::receipt::validation::{validate_form, ReceiptError};
use crate::receipt::words::WrittenAmount;
use crate::render::{DocumentSpec, HeaderMetadata, ReceiptRenderer};

pub const TITLE: &str = "ΑΠΟΔΕΙΞΗ ΕΙΣΠΡΑΞΗΣ";
pub const LOGO_PLACEHOLDER: &str = "LOGO PLACEHOLDER";
pub const DATE_FORMAT: &str = "%d/%m/%Y";

const LABEL_NUMBER: &str = "Αρ. Απόδειξης:";
const LABEL_DATE: &str = "Ημερομηνία:";
const LABEL_RECEIVED_FROM: &str = "Εισπράξαμε Από:";
const LABEL_PAYMENT_METHOD: &str = "Τρόπος Πληρωμής:";
const LABEL_CHECK_NUMBER: &str = "Αρ. Επιταγής:";
const LABEL_AMOUNT: &str = "Το Ποσό των:";
const LABEL_WRITTEN_AMOUNT: &str = "Ολογράφως:";
const SIGNATURE_CAPTION: &str = "Υπογραφή";
const NOTES_LABEL: &str = "Σημειώσεις:";

// ────────────────────────────────────────────────────────────────────────────
// Types
// ────────────────────────────────────────────────────────────────────────────

/// Fixed per-deployment settings.
#[derive(Debug, Clone)]
pub struct AssemblerSettings {
    pub page: PageConfig,
    pub output_dir: PathBuf,
    pub contact_lines: Vec<String>,
    pub signatory: String,
    pub default_copies: u32,
}

/// A validated receipt together with its complete page description.
#[derive(Debug, Clone, Serialize)]
pub struct ComposedReceipt {
    pub data: ReceiptData,
    pub written_amount: String,
    pub file_name: String,
    pub document: DocumentSpec,
}

/// Outcome of a successful generation.
#[derive(Debug, Clone, Serialize)]
pub struct GeneratedReceipt {
    pub receipt_number: u64,
    pub file_name: String,
    pub document_path: PathBuf,
    pub written_amount: String,
    pub copies: u32,
    /// False when print dispatch failed or is disabled; the document exists either way.
    pub printed: bool,
}

pub struct ReceiptAssembler {
    settings: AssemblerSettings,
    measure: Arc<dyn TextMeasure + Send + Sync>,
    renderer: Arc<dyn ReceiptRenderer>,
    printer: Arc<dyn PrintDispatcher>,
    counter: ReceiptCounter,
    // The guard is moved into the blocking render task and released when it finishes.
    generation: Arc<Mutex<()>>,
}

// ────────────────────────────────────────────────────────────────────────────
// Field list
// ────────────────────────────────────────────────────────────────────────────

/// The receipt body, top to bottom.
pub fn receipt_fields(
    data: &ReceiptData,
    written: &WrittenAmount,
    page: &PageConfig,
) -> Vec<FieldSpec> {
    let check_number = data.check_number.as_deref().unwrap_or_default();
    vec![
        FieldSpec::single(LABEL_NUMBER, data.receipt_number.to_string()),
        FieldSpec::single(LABEL_DATE, data.date_text.as_str()),
        FieldSpec::wrapped(
            LABEL_RECEIVED_FROM,
            data.received_from.as_str(),
            page.value_wrap_width_pt,
        ),
        FieldSpec::single(LABEL_PAYMENT_METHOD, data.payment_method.label()),
        FieldSpec::single(LABEL_CHECK_NUMBER, check_number)
            .only_if(data.payment_method.is_cheque() && !check_number.is_empty()),
        FieldSpec::single(LABEL_AMOUNT, data.amount_display()),
        FieldSpec::wrapped(
            LABEL_WRITTEN_AMOUNT,
            written.as_str(),
            page.value_wrap_width_pt,
        ),
    ]
}

// ────────────────────────────────────────────────────────────────────────────
// Assembler
// ────────────────────────────────────────────────────────────────────────────

impl ReceiptAssembler {
    pub fn new(
        settings: AssemblerSettings,
        measure: Arc<dyn TextMeasure + Send + Sync>,
        renderer: Arc<dyn ReceiptRenderer>,
        printer: Arc<dyn PrintDispatcher>,
        counter: ReceiptCounter,
    ) -> Self {
        Self {
            settings,
            measure,
            renderer,
            printer,
            counter,
            generation: Arc::new(Mutex::new(())),
        }
    }

    pub fn validate(&self, form: &ReceiptForm) -> Result<ReceiptData, ReceiptError> {
        validate_form(form, self.settings.default_copies, || {
            chrono::Local::now().format(DATE_FORMAT).to_string()
        })
    }

    /// Builds the full page description. Pure apart from reading settings.
    pub fn compose(&self, data: ReceiptData) -> Result<ComposedReceipt, AppError> {
        // Validation bounds the amount, so this only fails on a broken invariant.
        let written = WrittenAmount::new(data.amount_major, data.amount_minor)
            .context("Validated amount could not be spelled out")?;

        let page = &self.settings.page;
        let fields = receipt_fields(&data, &written, page);
        let plan = PageLayoutComposer::new(page, &*self.measure).compose(
            &fields,
            TrailerText {
                signature_caption: SIGNATURE_CAPTION,
                signatory: &self.settings.signatory,
                notes_label: NOTES_LABEL,
                notes: &data.notes,
            },
        );

        let file_name = document_file_name(
            data.receipt_number,
            &data.received_from,
            self.renderer.extension(),
        );

        Ok(ComposedReceipt {
            written_amount: written.to_string(),
            file_name,
            document: DocumentSpec {
                header: HeaderMetadata {
                    title: TITLE.to_string(),
                    contact_lines: self.settings.contact_lines.clone(),
                    logo_placeholder: LOGO_PLACEHOLDER.to_string(),
                },
                page: page.clone(),
                plan,
            },
            data,
        })
    }

    /// Number to pre-fill on a new form.
    pub fn suggest_next_number(&self) -> Result<u64, AppError> {
        Ok(self.counter.suggest_next()?)
    }

    /// Validates and composes without rendering, printing or touching the counter.
    pub async fn preview(self: Arc<Self>, form: ReceiptForm) -> Result<ComposedReceipt, AppError> {
        let data = self.validate(&form)?;
        tokio::task::spawn_blocking(move || self.compose(data))
            .await
            .map_err(|e| {
                AppError::Internal(anyhow::anyhow!("spawn_blocking failed in receipt preview: {e}"))
            })?
    }

    /// Full generation: validate, render, commit the counter, dispatch printing.
    pub async fn generate(self: Arc<Self>, form: ReceiptForm) -> Result<GeneratedReceipt, AppError> {
        let data = self.validate(&form)?;

        let guard = Arc::clone(&self.generation).lock_owned().await;
        let this = Arc::clone(&self);
        let mut generated = tokio::task::spawn_blocking(move || {
            let _guard = guard;
            this.render_and_commit(data)
        })
        .await
        .map_err(|e| {
            AppError::Internal(anyhow::anyhow!(
                "spawn_blocking failed in receipt generation: {e}"
            ))
        })??;

        let job = PrintJob {
            document_path: generated.document_path.clone(),
            copies: generated.copies,
        };
        generated.printed = match self.printer.dispatch(&job).await {
            Ok(()) => true,
            Err(PrintError::Disabled) => {
                debug!(
                    receipt_number = generated.receipt_number,
                    "Printing disabled; receipt document kept"
                );
                false
            }
            Err(e) => {
                warn!(
                    receipt_number = generated.receipt_number,
                    error = %e,
                    "Print dispatch failed; receipt document kept"
                );
                false
            }
        };

        Ok(generated)
    }

    fn render_and_commit(&self, data: ReceiptData) -> Result<GeneratedReceipt, AppError> {
        let composed = self.compose(data)?;
        let path = self.settings.output_dir.join(&composed.file_name);

        self.renderer.render(&composed.document, &path)?;
        info!(
            receipt_number = composed.data.receipt_number,
            rows = composed.document.plan.rows_used,
            path = %path.display(),
            "Receipt rendered"
        );

        self.counter
            .commit(composed.data.receipt_number)
            .context("Failed to persist receipt counter")?;

        Ok(GeneratedReceipt {
            receipt_number: composed.data.receipt_number,
            file_name: composed.file_name,
            document_path: path,
            written_amount: composed.written_amount,
            copies: composed.data.copies,
            printed: false,
        })
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;
    use std::sync::Mutex as StdMutex;

    use std::sync::mpsc;

    use async_trait::async_trait;

    use crate::layout::composer::{LayoutLine, LineValue};
    use crate::layout::{default_page_config, StaticMetrics};
    use crate::printing::{DisabledPrinter, PrintError};
    use crate::render::RenderError;

    #[derive(Default)]
    struct RecordingRenderer {
        fail: bool,
        rendered: StdMutex<Vec<PathBuf>>,
    }

    impl ReceiptRenderer for RecordingRenderer {
        fn extension(&self) -> &'static str {
            "svg"
        }

        fn render(&self, _document: &DocumentSpec, path: &Path) -> Result<(), RenderError> {
            if self.fail {
                return Err(RenderError::Write {
                    path: path.to_path_buf(),
                    source: std::io::Error::new(std::io::ErrorKind::Other, "font missing"),
                });
            }
            self.rendered.lock().unwrap().push(path.to_path_buf());
            Ok(())
        }
    }

    #[derive(Default)]
    struct RecordingPrinter {
        fail: bool,
        jobs: StdMutex<Vec<PrintJob>>,
    }

    #[async_trait]
    impl PrintDispatcher for RecordingPrinter {
        async fn dispatch(&self, job: &PrintJob) -> Result<(), PrintError> {
            self.jobs.lock().unwrap().push(job.clone());
            if self.fail {
                Err(PrintError::Failed {
                    program: "lp".into(),
                    status: "exit status: 1".into(),
                })
            } else {
                Ok(())
            }
        }
    }

    struct Harness {
        _dir: tempfile::TempDir,
        assembler: Arc<ReceiptAssembler>,
        renderer: Arc<RecordingRenderer>,
        printer: Arc<RecordingPrinter>,
        counter: ReceiptCounter,
    }

    fn assembler_with(
        dir: &Path,
        renderer: Arc<dyn ReceiptRenderer>,
        printer: Arc<dyn PrintDispatcher>,
        counter: &ReceiptCounter,
    ) -> Arc<ReceiptAssembler> {
        Arc::new(ReceiptAssembler::new(
            AssemblerSettings {
                page: default_page_config(),
                output_dir: dir.join("Receipts"),
                contact_lines: vec!["Company Information Placeholder".into()],
                signatory: "Name Placeholder".into(),
                default_copies: 3,
            },
            Arc::new(StaticMetrics),
            renderer,
            printer,
            counter.clone(),
        ))
    }

    fn harness(render_fails: bool, print_fails: bool) -> Harness {
        let dir = tempfile::tempdir().unwrap();
        let counter = ReceiptCounter::new(dir.path().join("receipt_number.json"));
        let renderer = Arc::new(RecordingRenderer {
            fail: render_fails,
            ..Default::default()
        });
        let printer = Arc::new(RecordingPrinter {
            fail: print_fails,
            ..Default::default()
        });
        let assembler = assembler_with(dir.path(), renderer.clone(), printer.clone(), &counter);
        Harness {
            _dir: dir,
            assembler,
            renderer,
            printer,
            counter,
        }
    }

    fn form() -> ReceiptForm {
        ReceiptForm {
            received_from: "Γιώργος Παπαδόπουλος".into(),
            amount: "1250".into(),
            cents: "50".into(),
            date: Some("05/06/2025".into()),
            receipt_number: "17".into(),
            payment_method: "Έμβασμα".into(),
            check_number: String::new(),
            notes: String::new(),
            copies: Some("2".into()),
        }
    }

    fn labels(composed: &ComposedReceipt) -> Vec<&str> {
        composed
            .document
            .plan
            .lines
            .iter()
            .map(|l| l.label.as_str())
            .collect()
    }

    #[tokio::test]
    async fn test_generate_renders_commits_and_prints() {
        let h = harness(false, false);
        let generated = h.assembler.clone().generate(form()).await.unwrap();

        assert_eq!(generated.receipt_number, 17);
        assert_eq!(generated.file_name, "Αποδειξη-17-Γιώργος_Παπαδόπουλος.svg");
        assert!(generated.document_path.ends_with("Receipts/Αποδειξη-17-Γιώργος_Παπαδόπουλος.svg"));
        assert_eq!(
            generated.written_amount,
            "ΕΥΡΟ ΧΙΛΙΑ ΔΙΑΚΟΣΙΑ ΠΕΝΗΝΤΑ ΚΑΙ ΠΕΝΗΝΤΑ ΣΕΝΤ ΜΟΝΟ"
        );
        assert!(generated.printed);

        assert_eq!(h.counter.latest().unwrap(), 17);
        assert_eq!(h.renderer.rendered.lock().unwrap().len(), 1);
        let jobs = h.printer.jobs.lock().unwrap();
        assert_eq!(jobs.len(), 1);
        assert_eq!(jobs[0].copies, 2);
        assert_eq!(jobs[0].document_path, generated.document_path);
    }

    #[tokio::test]
    async fn test_counter_takes_confirmed_number_regardless_of_previous() {
        let h = harness(false, false);
        h.counter.commit(500).unwrap();
        h.assembler.clone().generate(form()).await.unwrap();
        assert_eq!(h.counter.latest().unwrap(), 17);
    }

    #[tokio::test]
    async fn test_print_failure_is_not_fatal() {
        let h = harness(false, true);
        let generated = h.assembler.clone().generate(form()).await.unwrap();
        assert!(!generated.printed);
        assert_eq!(h.counter.latest().unwrap(), 17);
    }

    #[tokio::test]
    async fn test_disabled_printer_reports_not_printed() {
        let dir = tempfile::tempdir().unwrap();
        let counter = ReceiptCounter::new(dir.path().join("receipt_number.json"));
        let renderer = Arc::new(RecordingRenderer::default());
        let assembler = assembler_with(dir.path(), renderer, Arc::new(DisabledPrinter), &counter);

        let generated = assembler.generate(form()).await.unwrap();
        assert!(!generated.printed);
        assert_eq!(counter.latest().unwrap(), 17);
    }

    /// Blocks inside `render` until the test releases it.
    struct GatedRenderer {
        entered: StdMutex<mpsc::Sender<()>>,
        release: StdMutex<mpsc::Receiver<()>>,
    }

    impl ReceiptRenderer for GatedRenderer {
        fn extension(&self) -> &'static str {
            "svg"
        }

        fn render(&self, _document: &DocumentSpec, _path: &Path) -> Result<(), RenderError> {
            self.entered.lock().unwrap().send(()).unwrap();
            self.release.lock().unwrap().recv().unwrap();
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_cancelled_request_keeps_generation_locked_until_render_ends() {
        let dir = tempfile::tempdir().unwrap();
        let counter = ReceiptCounter::new(dir.path().join("receipt_number.json"));
        let (entered_tx, entered_rx) = mpsc::channel();
        let (release_tx, release_rx) = mpsc::channel();
        let renderer = Arc::new(GatedRenderer {
            entered: StdMutex::new(entered_tx),
            release: StdMutex::new(release_rx),
        });
        let assembler = assembler_with(
            dir.path(),
            renderer,
            Arc::new(RecordingPrinter::default()),
            &counter,
        );

        let request = tokio::spawn(Arc::clone(&assembler).generate(form()));
        tokio::task::spawn_blocking(move || entered_rx.recv().unwrap())
            .await
            .unwrap();

        request.abort();
        assert!(request.await.unwrap_err().is_cancelled());

        // The render is still running, so the generation lock must still be held.
        assert!(assembler.generation.try_lock().is_err());
        assert_eq!(counter.latest().unwrap(), 0);

        release_tx.send(()).unwrap();
        let _guard = assembler.generation.lock().await;
        assert_eq!(counter.latest().unwrap(), 17);
    }

    #[tokio::test]
    async fn test_render_failure_does_not_commit_counter() {
        let h = harness(true, false);
        h.counter.commit(9).unwrap();
        let err = h.assembler.clone().generate(form()).await.unwrap_err();
        assert!(matches!(err, AppError::Render(_)));
        assert_eq!(h.counter.latest().unwrap(), 9);
        assert!(h.printer.jobs.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_invalid_form_has_no_side_effects() {
        let h = harness(false, false);
        let bad = ReceiptForm {
            copies: Some("0".into()),
            ..form()
        };
        let err = h.assembler.clone().generate(bad).await.unwrap_err();
        assert!(matches!(err, AppError::Receipt(ReceiptError::InvalidCopies)));
        assert_eq!(h.counter.latest().unwrap(), 0);
        assert!(h.renderer.rendered.lock().unwrap().is_empty());
        assert!(h.printer.jobs.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_preview_has_no_side_effects() {
        let h = harness(false, false);
        let composed = h.assembler.clone().preview(form()).await.unwrap();
        assert_eq!(composed.file_name, "Αποδειξη-17-Γιώργος_Παπαδόπουλος.svg");
        assert_eq!(h.counter.latest().unwrap(), 0);
        assert!(h.renderer.rendered.lock().unwrap().is_empty());
    }

    #[test]
    fn test_field_order_without_cheque() {
        let h = harness(false, false);
        let data = h.assembler.validate(&form()).unwrap();
        let composed = h.assembler.compose(data).unwrap();
        assert_eq!(
            labels(&composed),
            vec![
                "Αρ. Απόδειξης:",
                "Ημερομηνία:",
                "Εισπράξαμε Από:",
                "Τρόπος Πληρωμής:",
                "Το Ποσό των:",
                "Ολογράφως:",
            ]
        );
        let amount = &composed.document.plan.lines[4];
        assert_eq!(amount.value, LineValue::Single("€1250,50".into()));
        assert_eq!(amount.row_index, 4);
    }

    #[test]
    fn test_cheque_row_present_with_number() {
        let h = harness(false, false);
        let data = h
            .assembler
            .validate(&ReceiptForm {
                payment_method: "επιταγή".into(),
                check_number: "A-1234".into(),
                ..form()
            })
            .unwrap();
        let composed = h.assembler.compose(data).unwrap();
        let lines = &composed.document.plan.lines;
        assert_eq!(lines[4].label, "Αρ. Επιταγής:");
        assert_eq!(lines[4].value, LineValue::Single("A-1234".into()));
        assert_eq!(lines[3].value, LineValue::Single("Επιταγή".into()));

        let total: u32 = lines.iter().map(LayoutLine::rows_consumed).sum();
        assert_eq!(composed.document.plan.rows_used, total);

        let cash = h.assembler.compose(h.assembler.validate(&form()).unwrap()).unwrap();
        assert_eq!(
            composed.document.plan.rows_used,
            cash.document.plan.rows_used + 1
        );
    }

    #[test]
    fn test_cheque_without_number_omits_row() {
        let h = harness(false, false);
        let data = h
            .assembler
            .validate(&ReceiptForm {
                payment_method: "Επιταγή".into(),
                check_number: String::new(),
                ..form()
            })
            .unwrap();
        let composed = h.assembler.compose(data).unwrap();
        assert!(!labels(&composed).contains(&"Αρ. Επιταγής:"));

        let cash = h.assembler.compose(h.assembler.validate(&form()).unwrap()).unwrap();
        assert_eq!(
            composed.document.plan.rows_used,
            cash.document.plan.rows_used
        );
        assert_eq!(
            composed.document.plan.lines[4].row_index,
            cash.document.plan.lines[4].row_index
        );
    }

    #[test]
    fn test_written_amount_wraps_onto_extra_row() {
        let h = harness(false, false);
        let composed = h.assembler.compose(h.assembler.validate(&form()).unwrap()).unwrap();
        let written = composed.document.plan.lines.last().unwrap();
        assert_eq!(written.label, "Ολογράφως:");
        assert!(written.extra_rows >= 1);
        assert_eq!(
            written.extra_rows as usize + 1,
            written.value.lines().len()
        );
        assert_eq!(
            written.value.lines().join(" "),
            "ΕΥΡΟ ΧΙΛΙΑ ΔΙΑΚΟΣΙΑ ΠΕΝΗΝΤΑ ΚΑΙ ΠΕΝΗΝΤΑ ΣΕΝΤ ΜΟΝΟ"
        );
        assert_eq!(
            composed.document.plan.rows_used,
            written.row_index + written.rows_consumed()
        );
    }

    #[test]
    fn test_long_payer_wraps_and_shifts_rows() {
        let h = harness(false, false);
        let payer = "Ανώνυμη Εταιρεία Εμπορίας και Διανομής Ηλεκτρολογικού και Υδραυλικού \
                     Υλικού Βορείου Ελλάδος και Νήσων Αιγαίου";
        let data = h
            .assembler
            .validate(&ReceiptForm {
                received_from: payer.into(),
                ..form()
            })
            .unwrap();
        let composed = h.assembler.compose(data).unwrap();
        let lines = &composed.document.plan.lines;
        let payer_line = &lines[2];
        assert!(payer_line.extra_rows >= 1);
        assert_eq!(lines[3].row_index, 3 + payer_line.extra_rows);
        let total: u32 = lines.iter().map(|l| l.rows_consumed()).sum();
        assert_eq!(composed.document.plan.rows_used, total);
    }

    #[test]
    fn test_notes_block_only_with_notes() {
        let h = harness(false, false);
        let without = h.assembler.compose(h.assembler.validate(&form()).unwrap()).unwrap();
        assert!(without.document.plan.notes.is_none());

        let data = h
            .assembler
            .validate(&ReceiptForm {
                notes: "Εξόφληση τιμολογίου 2025/118".into(),
                ..form()
            })
            .unwrap();
        let with = h.assembler.compose(data).unwrap();
        let notes = with.document.plan.notes.expect("notes block");
        assert_eq!(notes.label, "Σημειώσεις:");
        assert_eq!(notes.lines, vec!["Εξόφληση τιμολογίου 2025/118"]);
    }

    #[test]
    fn test_suggest_next_number() {
        let h = harness(false, false);
        assert_eq!(h.assembler.suggest_next_number().unwrap(), 1);
        h.counter.commit(41).unwrap();
        assert_eq!(h.assembler.suggest_next_number().unwrap(), 42);
    }
}

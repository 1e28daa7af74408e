//! Receipt service - orchestrates generation, persistence and printing
//!
//! Generation and physical printing are decoupled: the receipt row is
//! inserted first and a print failure only updates its status, so a
//! generated receipt stays retrievable and re-printable no matter what the
//! hardware does. One insert per generation, at most one status update,
//! never a re-insert.

use std::sync::Arc;

use chrono::Utc;
use tracing::{info, instrument, warn};

use crate::printing::{PrintJob, PrinterService, encode_receipt};
use crate::store::{NewReceipt, ReceiptStatusUpdate, ReceiptStore, ReceiptTemplateRow};
use crate::utils::error::{AppError, AppResult};

use super::assembler::assemble;
use super::renderer;
use super::types::{ReceiptData, ReceiptFormat};

/// Parameters of one generation request
#[derive(Debug, Clone)]
pub struct GenerateReceiptRequest {
    pub attendance_record_id: String,
    pub template_id: Option<String>,
    pub format: ReceiptFormat,
    pub auto_print: bool,
}

/// Outcome of a generation request
#[derive(Debug, Clone, serde::Serialize)]
pub struct GeneratedReceipt {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub receipt_number: Option<String>,
    pub content: String,
    pub format: ReceiptFormat,
    pub printed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub print_error: Option<String>,
}

/// Outcome of printing an already-generated receipt
#[derive(Debug, Clone, serde::Serialize)]
pub struct PrintOutcome {
    pub printed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub print_error: Option<String>,
}

pub struct ReceiptService {
    store: Arc<dyn ReceiptStore>,
    printer: Arc<PrinterService>,
    institution: String,
    footer: String,
}

impl ReceiptService {
    pub fn new(
        store: Arc<dyn ReceiptStore>,
        printer: Arc<PrinterService>,
        institution: impl Into<String>,
        footer: impl Into<String>,
    ) -> Self {
        Self {
            store,
            printer,
            institution: institution.into(),
            footer: footer.into(),
        }
    }

    /// Generate a receipt for an attendance record
    ///
    /// Fetches the record and template, assembles the snapshot, renders it,
    /// persists the receipt row, and optionally pushes a thermal print.
    #[instrument(skip(self), fields(record_id = %request.attendance_record_id))]
    pub async fn generate_receipt(
        &self,
        request: GenerateReceiptRequest,
    ) -> AppResult<GeneratedReceipt> {
        if request.attendance_record_id.trim().is_empty() {
            return Err(AppError::Validation(
                "attendance_record_id is required".to_string(),
            ));
        }

        let record = self
            .store
            .get_attendance_record(&request.attendance_record_id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!(
                    "Attendance record {}",
                    request.attendance_record_id
                ))
            })?;

        let template = self.resolve_template(request.template_id.as_deref()).await?;

        let data = assemble(
            &record,
            template.as_ref(),
            &self.institution,
            &self.footer,
            Utc::now(),
        );
        let content = renderer::render(&data, request.format)?;

        let snapshot = serde_json::to_value(&data)
            .map_err(|e| AppError::Internal(format!("receipt snapshot: {}", e)))?;

        let row = self
            .store
            .insert_receipt(&NewReceipt {
                attendance_record_id: record.id.clone(),
                student_id: record.student_id.clone(),
                class_id: record.class_id.clone(),
                event_id: record.event_id.clone(),
                receipt_data: snapshot,
                template_id: template.as_ref().map(|t| t.id.clone()),
                print_method: request.format.to_string(),
                status: "generated".to_string(),
            })
            .await?;

        info!(receipt_id = %row.id, format = %request.format, "Receipt generated");

        let mut printed = false;
        let mut print_error = None;
        if request.auto_print && request.format == ReceiptFormat::Thermal {
            match self.print_snapshot(&data, Some(row.id.clone())).await {
                Ok(job) => {
                    printed = job.succeeded();
                    if let Some(error) = &job.error {
                        warn!(receipt_id = %row.id, error = %error, "Auto-print failed");
                    }
                    print_error = job.error;
                }
                Err(e) => {
                    // Rejected before a job was queued; the dispatcher never
                    // saw it, so the failed status is written here.
                    warn!(receipt_id = %row.id, error = %e, "Auto-print rejected");
                    print_error = Some(e.to_string());
                    self.mark_failed(&row.id, &e.to_string()).await;
                }
            }
        }

        Ok(GeneratedReceipt {
            id: row.id,
            receipt_number: row.receipt_number,
            content,
            format: request.format,
            printed,
            print_error,
        })
    }

    /// Re-print a previously generated receipt from its stored snapshot
    ///
    /// Uses the snapshot, not a fresh assembly, so the reprint matches the
    /// original even if the attendance record changed since.
    #[instrument(skip(self))]
    pub async fn reprint_receipt(&self, receipt_id: &str) -> AppResult<PrintOutcome> {
        let row = self
            .store
            .get_receipt(receipt_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Receipt {}", receipt_id)))?;

        let snapshot = row
            .receipt_data
            .ok_or_else(|| AppError::Render(format!("Receipt {} has no snapshot", receipt_id)))?;
        let data: ReceiptData = serde_json::from_value(snapshot)
            .map_err(|e| AppError::Render(format!("receipt snapshot unreadable: {}", e)))?;

        let job = self
            .print_snapshot(&data, Some(row.id.clone()))
            .await
            .map_err(AppError::from)?;
        info!(receipt_id = %row.id, printed = job.succeeded(), "Receipt re-printed");
        Ok(PrintOutcome {
            printed: job.succeeded(),
            print_error: job.error,
        })
    }

    /// Print a synthetic receipt for hardware diagnostics
    pub async fn print_test_page(&self) -> AppResult<bool> {
        let data = test_page_data(&self.institution, &self.footer);
        let printed = self.print_snapshot(&data, None).await?.succeeded();
        info!(printed, "Test page dispatched");
        Ok(printed)
    }

    async fn resolve_template(
        &self,
        template_id: Option<&str>,
    ) -> AppResult<Option<ReceiptTemplateRow>> {
        match template_id {
            Some(id) => {
                let template = self
                    .store
                    .get_template(id)
                    .await?
                    .ok_or_else(|| AppError::NotFound(format!("Template {}", id)))?;
                Ok(Some(template))
            }
            // Absent default template is fine, the assembler falls back
            None => Ok(self.store.get_default_template().await?),
        }
    }

    /// Encode with the active printer config and queue the job
    ///
    /// The terminal job carries the failure message when the dispatcher
    /// fails it; `Err` means the job was rejected before being queued.
    async fn print_snapshot(
        &self,
        data: &ReceiptData,
        receipt_id: Option<String>,
    ) -> Result<PrintJob, recibo_printer::PrintError> {
        let config = self.printer.config().await;
        let commands = encode_receipt(data, &config);
        self.printer.print(commands, receipt_id).await
    }

    async fn mark_failed(&self, receipt_id: &str, reason: &str) {
        let update = ReceiptStatusUpdate {
            status: "failed".to_string(),
            printed_at: None,
            printer_info: Some(serde_json::json!({ "error": reason })),
        };
        if let Err(e) = self.store.update_receipt_status(receipt_id, &update).await {
            warn!(receipt_id = %receipt_id, error = %e, "Failed to mark receipt failed");
        }
    }
}

/// Fixed sample snapshot for [`ReceiptService::print_test_page`]
fn test_page_data(institution: &str, footer: &str) -> ReceiptData {
    use super::types::{ActivityInfo, AttendanceInfo, StudentInfo, TemplateInfo};
    use recibo_printer::PaperWidth;

    let now = Utc::now();
    ReceiptData {
        attendance_record_id: "teste".to_string(),
        institution: institution.to_string(),
        title: "PAGINA DE TESTE".to_string(),
        student: StudentInfo {
            id: "teste".to_string(),
            name: "Aluno de Teste".to_string(),
            badge_number: Some("0000".to_string()),
        },
        activity: ActivityInfo {
            kind: "Aula".to_string(),
            name: "Teste de Impressora".to_string(),
            subject: None,
            date: now,
            check_in: Some(now),
            check_out: None,
        },
        attendance: AttendanceInfo {
            status: "presente".to_string(),
            status_label: "PRESENTE".to_string(),
            verification_label: "Manual".to_string(),
            notes: None,
        },
        template: TemplateInfo {
            id: None,
            name: "Pagina de Teste".to_string(),
            paper_width: PaperWidth::Mm80,
        },
        footer: footer.to_string(),
        qr_payload: None,
        generated_at: now,
    }
}

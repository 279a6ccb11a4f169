use lettre::{
    message::header::ContentType, transport::smtp::authentication::Credentials, Message,
    SmtpTransport, Transport,
};

use crate::config::SmtpConfig;
use crate::errors::AppError;
use crate::models::AnalysisReport;
use crate::services::report_service;

/// Email a finished report. With SMTP disabled in config the mail is logged
/// instead of sent, so the scheduled job stays observable in development.
pub async fn send_report_email(
    smtp: &SmtpConfig,
    recipient: &str,
    report: &AnalysisReport,
) -> Result<(), AppError> {
    let subject = report_service::email_subject(report);
    let body = report_service::email_body(report)
        .map_err(|e| AppError::External(format!("failed to render report: {}", e)))?;

    if !smtp.enabled {
        log_report_email(recipient, &subject, report);
        return Ok(());
    }

    send_via_smtp(smtp, recipient, &subject, body).map_err(AppError::External)
}

fn log_report_email(to_email: &str, subject: &str, report: &AnalysisReport) {
    println!("📧 Report email would be sent (SMTP disabled):");
    println!("   To: {}", to_email);
    println!("   Subject: {}", subject);
    println!("   Transactions: {}", report.summary.transactions);
    println!("   Total revenue: {}", report.summary.total_revenue);
    println!("   Total profit: {}", report.summary.total_profit);
    println!();
}

fn send_via_smtp(
    smtp: &SmtpConfig,
    to_email: &str,
    subject: &str,
    body: String,
) -> Result<(), String> {
    let from_address = format!("{} <{}>", smtp.from_name, smtp.from_email)
        .parse()
        .map_err(|e| format!("Invalid from address: {}", e))?;

    let to_address = to_email
        .parse()
        .map_err(|e| format!("Invalid to address: {}", e))?;

    let email = Message::builder()
        .from(from_address)
        .to(to_address)
        .subject(subject)
        .header(ContentType::TEXT_PLAIN)
        .body(body)
        .map_err(|e| format!("Failed to build email: {}", e))?;

    let creds = Credentials::new(smtp.username.clone(), smtp.password.clone());

    println!("🔌 Connecting to SMTP server: {}:{}", smtp.host, smtp.port);

    // Implicit TLS, the port-465 setup Gmail and most shared hosts expect
    let mailer = SmtpTransport::relay(&smtp.host)
        .map_err(|e| format!("Failed to create SMTP transport: {}", e))?
        .port(smtp.port)
        .credentials(creds)
        .build();

    println!("📤 Sending report email to {}...", to_email);
    match mailer.send(&email) {
        Ok(_) => {
            println!("✅ Report email sent to {}", to_email);
            Ok(())
        }
        Err(e) => {
            eprintln!("❌ SMTP Error: {:?}", e);
            Err(format!("SMTP send failed: {}", e))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::analysis_service::{aggregate, build_report};
    use chrono::{TimeZone, Utc};

    fn disabled_config() -> SmtpConfig {
        SmtpConfig {
            enabled: false,
            host: String::new(),
            port: 465,
            username: String::new(),
            password: String::new(),
            from_email: String::new(),
            from_name: "Dukadash".to_string(),
        }
    }

    #[tokio::test]
    async fn test_disabled_smtp_logs_instead_of_sending() {
        let report = build_report(
            &aggregate(&[]).unwrap(),
            Utc.with_ymd_and_hms(2024, 1, 7, 6, 0, 0).unwrap(),
        );

        let result = send_report_email(&disabled_config(), "owner@example.com", &report).await;
        assert!(result.is_ok());
    }
}

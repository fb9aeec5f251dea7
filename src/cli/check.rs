use std::path::PathBuf;

use bloodlink::{
    BloodRequest, Config, Notification, NotificationKind, RegistrationData, RequestDraft, Role,
    ValidationResult,
    domain::{password_strength, registration::validate_registration_with, validation::parse_date},
};
use chrono::{Local, NaiveDateTime};
use clap::Parser;
use tracing::instrument;

use super::{
    OutputFormat, load_document,
    terminal::{self, Colorize},
};

fn parse_now(s: &str) -> Result<NaiveDateTime, String> {
    parse_date(s).ok_or_else(|| format!("invalid date-time '{s}'"))
}

#[derive(Debug, Parser)]
#[command(about = "Validate a blood request draft")]
pub struct CheckRequest {
    /// Path to the draft (.toml or .json)
    file: PathBuf,

    /// Evaluate the required date as if it were this moment (local time)
    #[arg(long, value_parser = parse_now)]
    now: Option<NaiveDateTime>,

    /// Output format
    #[arg(long, value_name = "FORMAT", default_value = "table")]
    output: OutputFormat,
}

impl CheckRequest {
    #[instrument(level = "debug", skip(self, config), fields(file = %self.file.display()))]
    pub fn run(self, config: &Config) -> anyhow::Result<()> {
        let draft: RequestDraft = load_document(&self.file)?;
        let now = self.now.unwrap_or_else(|| Local::now().naive_local());

        match draft.into_request_with(now, config) {
            Ok(request) => {
                match self.output {
                    OutputFormat::Json => print_json(&ValidationResult::new())?,
                    OutputFormat::Table => {
                        terminal::render(&Notification::<anyhow::Error>::success(
                            "Request is valid",
                            summarize(&request),
                        ));
                    }
                }
                Ok(())
            }
            Err(result) => report_invalid(&result, self.output),
        }
    }
}

fn summarize(request: &BloodRequest) -> String {
    let donors = request
        .eligible_donors()
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "{} unit(s) of {} ({} urgency) for {}, needed by {}.\nEligible donors: {donors}",
        request.units,
        request.blood_type,
        request.urgency,
        request.patient_name.as_str(),
        request.required_date.format("%Y-%m-%d %H:%M"),
    )
}

#[derive(Debug, Parser)]
#[command(about = "Validate registration data for a role")]
pub struct CheckRegistration {
    /// Path to the registration data (.toml or .json)
    file: PathBuf,

    /// Account role: donor, hospital, bloodbank or admin
    #[arg(long)]
    role: String,

    /// Output format
    #[arg(long, value_name = "FORMAT", default_value = "table")]
    output: OutputFormat,
}

impl CheckRegistration {
    #[instrument(level = "debug", skip(self, config), fields(file = %self.file.display()))]
    pub fn run(self, config: &Config) -> anyhow::Result<()> {
        let data: RegistrationData = load_document(&self.file)?;
        let role: Role = self.role.parse()?;
        if role == Role::Unknown {
            tracing::warn!("Unrecognised role '{}': only common checks apply", self.role);
        }

        let result = validate_registration_with(&data, role, config);
        if !result.is_valid() {
            return report_invalid(&result, self.output);
        }

        match self.output {
            OutputFormat::Json => print_json(&result)?,
            OutputFormat::Table => {
                let mut message = format!(
                    "{role} registration for {} passed all checks.",
                    data.name.trim()
                );
                if let Some(password) = &data.password {
                    message.push_str("\nPassword strength: ");
                    message.push_str(password_strength(password).as_str());
                }
                terminal::render(&Notification::<anyhow::Error>::success(
                    "Registration is valid",
                    message,
                ));
            }
        }
        Ok(())
    }
}

fn to_json(result: &ValidationResult) -> serde_json::Result<String> {
    serde_json::to_string_pretty(result)
}

fn print_json(result: &ValidationResult) -> anyhow::Result<()> {
    println!("{}", to_json(result)?);
    Ok(())
}

fn report_invalid(result: &ValidationResult, output: OutputFormat) -> anyhow::Result<()> {
    match output {
        OutputFormat::Json => print_json(result)?,
        OutputFormat::Table => {
            for error in result.errors() {
                println!(
                    "  {} {}",
                    format!("{}:", error.field).paint(NotificationKind::Danger),
                    error.message
                );
            }
        }
    }
    anyhow::bail!("{} invalid field(s)", result.errors().len())
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    fn document(suffix: &str, content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    fn now() -> NaiveDateTime {
        parse_now("2026-10-18T09:00").unwrap()
    }

    #[test]
    fn check_request_accepts_valid_toml_draft() {
        let file = document(
            ".toml",
            r#"
bloodGroup = "O-"
unitsNeeded = 2
urgency = "critical"
requiredDate = "2026-10-19"
patientName = "Ada Obi"
patientAge = 34
contactPerson = "Dr. Bello"
contactPhone = "+2348012345678"
"#,
        );

        let command = CheckRequest {
            file: file.path().to_path_buf(),
            now: Some(now()),
            output: OutputFormat::Json,
        };
        command.run(&Config::default()).unwrap();
    }

    #[test]
    fn check_request_fails_with_error_count() {
        let file = document(
            ".json",
            r#"{"bloodGroup":"A+","unitsNeeded":400,"patientAge":"34"}"#,
        );

        let command = CheckRequest {
            file: file.path().to_path_buf(),
            now: Some(now()),
            output: OutputFormat::Table,
        };
        let error = command.run(&Config::default()).unwrap_err();

        // units, required date, patient name, contact person, contact phone
        assert_eq!(error.to_string(), "5 invalid field(s)");
    }

    #[test]
    fn check_registration_reports_role_specific_failures() {
        let file = document(
            ".json",
            r#"{
                "name": "St. Luke",
                "email": "admin@stluke.example",
                "phone": "(0)1 234",
                "hospitalDetails": { "registrationNumber": " " }
            }"#,
        );

        let command = CheckRegistration {
            file: file.path().to_path_buf(),
            role: "hospital".to_string(),
            output: OutputFormat::Json,
        };
        let error = command.run(&Config::default()).unwrap_err();
        assert_eq!(error.to_string(), "2 invalid field(s)");

        let data: RegistrationData = load_document(file.path()).unwrap();
        let result = validate_registration_with(&data, Role::Hospital, &Config::default());
        let json: serde_json::Value = serde_json::from_str(&to_json(&result).unwrap()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "isValid": false,
                "errors": {
                    "phone": "Please enter a valid phone number",
                    "hospitalDetails.registrationNumber": "Registration number is required"
                }
            })
        );
    }

    #[test]
    fn check_registration_accepts_valid_donor() {
        let file = document(
            ".toml",
            r#"
name = "Chidi Okafor"
email = "chidi@example.org"
phone = "+234 801 234 5678"
password = "s3cret-Pass"
confirmPassword = "s3cret-Pass"
bloodGroup = "AB-"
"#,
        );

        let command = CheckRegistration {
            file: file.path().to_path_buf(),
            role: "donor".to_string(),
            output: OutputFormat::Table,
        };
        command.run(&Config::default()).unwrap();
    }
}

use crate::domain::entities::ArgumentModel;
use crate::domain::errors::CommandError;

const ALLOWED_METHODS: [&str; 3] = ["GET", "POST", "HEAD"];
const BOUNDED_RANGE: std::ops::RangeInclusive<i64> = 1..=100;

/// Validation rules for parsed `http` arguments.
///
/// Checks run in a fixed order and the first failure is returned: method
/// whitelist, body flags vs. method, body flag exclusivity, numeric bounds.
pub struct ArgsValidator;

impl ArgsValidator {
    pub fn validate(args: &ArgumentModel) -> Result<(), CommandError> {
        Self::validate_method(args)?;
        Self::validate_body_method_combination(args)?;
        Self::validate_body_exclusivity(args)?;
        Self::validate_bounds(args)?;
        Ok(())
    }

    fn validate_method(args: &ArgumentModel) -> Result<(), CommandError> {
        let verb = args.verb.to_uppercase();
        if ALLOWED_METHODS.contains(&verb.as_str()) {
            Ok(())
        } else {
            Err(CommandError::InvalidMethod(args.verb.clone()))
        }
    }

    fn validate_body_method_combination(args: &ArgumentModel) -> Result<(), CommandError> {
        let has_body_flag = args.was_set("body") || args.was_set("body-file");
        if has_body_flag && args.verb.to_uppercase() != "POST" {
            return Err(CommandError::InvalidUsage(format!(
                "-body and -body-file are only allowed with POST, not {}",
                args.verb.to_uppercase()
            )));
        }
        Ok(())
    }

    fn validate_body_exclusivity(args: &ArgumentModel) -> Result<(), CommandError> {
        if args.was_set("body") && args.was_set("body-file") {
            return Err(CommandError::InvalidUsage(
                "-body and -body-file are mutually exclusive".to_string(),
            ));
        }
        Ok(())
    }

    fn validate_bounds(args: &ArgumentModel) -> Result<(), CommandError> {
        for (flag, value) in [
            ("max-idle-conns", args.max_idle_connections),
            ("num-requests", args.retry_count),
        ] {
            if !BOUNDED_RANGE.contains(&value) {
                return Err(CommandError::InvalidUsage(format!(
                    "-{} must be between 1 and 100, got {}",
                    flag, value
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(verb: &str, set: &[&str]) -> ArgumentModel {
        ArgumentModel {
            verb: verb.to_string(),
            url: "http://localhost/".to_string(),
            explicitly_set: set.iter().map(|s| s.to_string()).collect(),
            ..ArgumentModel::default()
        }
    }

    #[test]
    fn accepts_whitelisted_methods_in_any_case() {
        for verb in ["get", "Get", "GET", "post", "HEAD", "head"] {
            assert!(ArgsValidator::validate(&args(verb, &[])).is_ok(), "{verb}");
        }
    }

    #[test]
    fn rejects_methods_outside_the_whitelist() {
        for verb in ["PUT", "delete", "PATCH", "OPTIONS", "", "FETCH"] {
            assert!(
                matches!(
                    ArgsValidator::validate(&args(verb, &[])),
                    Err(CommandError::InvalidMethod(_))
                ),
                "{verb}"
            );
        }
    }

    #[test]
    fn body_flags_require_post() {
        for verb in ["GET", "HEAD"] {
            for flag in ["body", "body-file"] {
                assert!(matches!(
                    ArgsValidator::validate(&args(verb, &[flag])),
                    Err(CommandError::InvalidUsage(_))
                ));
            }
        }
        assert!(ArgsValidator::validate(&args("post", &["body"])).is_ok());
        assert!(ArgsValidator::validate(&args("post", &["body-file"])).is_ok());
    }

    #[test]
    fn body_flags_are_mutually_exclusive() {
        assert!(matches!(
            ArgsValidator::validate(&args("POST", &["body", "body-file"])),
            Err(CommandError::InvalidUsage(msg)) if msg.contains("mutually exclusive")
        ));
    }

    #[test]
    fn default_body_values_do_not_count_as_set() {
        let mut a = args("GET", &[]);
        a.body = "ignored default".to_string();
        assert!(ArgsValidator::validate(&a).is_ok());
    }

    #[test]
    fn numeric_flags_are_bounded() {
        for value in [0, 101, -1] {
            let mut a = args("GET", &[]);
            a.max_idle_connections = value;
            assert!(matches!(
                ArgsValidator::validate(&a),
                Err(CommandError::InvalidUsage(msg)) if msg.contains("max-idle-conns")
            ));

            let mut a = args("GET", &[]);
            a.retry_count = value;
            assert!(matches!(
                ArgsValidator::validate(&a),
                Err(CommandError::InvalidUsage(msg)) if msg.contains("num-requests")
            ));
        }

        for value in [1, 100] {
            let mut a = args("GET", &[]);
            a.max_idle_connections = value;
            a.retry_count = value;
            assert!(ArgsValidator::validate(&a).is_ok());
        }
    }

    #[test]
    fn first_failing_check_wins() {
        let mut a = args("PUT", &["body", "body-file"]);
        a.max_idle_connections = 0;
        assert!(matches!(
            ArgsValidator::validate(&a),
            Err(CommandError::InvalidMethod(_))
        ));

        let mut a = args("GET", &["body", "body-file"]);
        a.retry_count = 0;
        assert!(matches!(
            ArgsValidator::validate(&a),
            Err(CommandError::InvalidUsage(msg)) if msg.contains("only allowed with POST")
        ));
    }
}

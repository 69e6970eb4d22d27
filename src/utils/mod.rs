//! The `utils` module provides the shared pieces used across the crate:
//! the error taxonomy and tracing initialisation.

pub mod error;
pub mod logging;

pub use error::{ConversionError, DeliveryError};

#[cfg(test)]
mod tests {
    use super::error::{ConversionError, DeliveryError};
    use super::logging;
    use crate::converter::ConverterKind;

    #[test]
    fn logging_init_accepts_levels() {
        // Should not panic
        logging::init("info");
        logging::init("debug");
        logging::init("warn");
    }

    #[test]
    fn parse_level_falls_back_to_info() {
        assert_eq!(logging::parse_level("WARNING"), tracing::Level::WARN);
        assert_eq!(logging::parse_level("trace"), tracing::Level::TRACE);
        assert_eq!(logging::parse_level("verbose"), tracing::Level::INFO);
    }

    #[test]
    fn conversion_error_names_converter_kind() {
        let err = DeliveryError::Conversion {
            kind: ConverterKind::UTF8_STRING,
            source: ConversionError::UnsupportedType {
                expected: "String or &'static str",
            },
        };
        let text = err.to_string();
        assert!(text.contains("utf8-string"));
        assert!(text.contains("String or &'static str"));
    }
}

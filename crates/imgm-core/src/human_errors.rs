// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Human-readable error messages for the command line.
//
// Every technical error is mapped to plain English with a clear suggestion and
// an error class that decides the process exit code.

use crate::error::ImgmError;
use crate::types::ErrorClass;

/// A human-readable error with plain English message and actionable suggestion.
#[derive(Debug, Clone)]
pub struct HumanError {
    /// Plain English summary (first line of output).
    pub message: String,
    /// What the user should try.
    pub suggestion: String,
    /// Drives the exit code.
    pub class: ErrorClass,
}

impl HumanError {
    /// Process exit code for this error.
    pub fn exit_code(&self) -> u8 {
        self.class.exit_code()
    }
}

/// Convert an `ImgmError` into a `HumanError`.
pub fn humanize_error(err: &ImgmError) -> HumanError {
    match err {
        // -- Reading --
        ImgmError::FileOpen { path, source } => {
            if source.kind() == std::io::ErrorKind::NotFound {
                HumanError {
                    message: format!("The file {path} couldn't be found."),
                    suggestion: "Check the path after -i and try again.".into(),
                    class: ErrorClass::Input,
                }
            } else if source.kind() == std::io::ErrorKind::PermissionDenied {
                HumanError {
                    message: format!("There is no permission to read {path}."),
                    suggestion: "Check the file permissions, or copy the file somewhere readable first.".into(),
                    class: ErrorClass::Input,
                }
            } else {
                HumanError {
                    message: "There has been an error while opening the file.".into(),
                    suggestion: format!("Make sure {path} is a readable file. ({source})"),
                    class: ErrorClass::Input,
                }
            }
        }

        ImgmError::SignatureMismatch { expected, .. } => HumanError {
            message: "The file's signature is not correct, so the format is not supported.".into(),
            suggestion: format!("The file should start with {expected:?}. Check that the extension matches the real format."),
            class: ErrorClass::Input,
        },

        ImgmError::UnsupportedMetadata(detail) => HumanError {
            message: "This image uses header options that aren't supported.".into(),
            suggestion: format!("Only uncompressed 24-bit BMP and 8-bit binary PGM are supported. ({detail})"),
            class: ErrorClass::Input,
        },

        ImgmError::MalformedHeader(detail) => HumanError {
            message: "The image header could not be read.".into(),
            suggestion: format!("The file may be damaged or use comments in its header. ({detail})"),
            class: ErrorClass::Input,
        },

        ImgmError::Truncated { .. } => HumanError {
            message: "The image file ends too early.".into(),
            suggestion: "The file is probably incomplete. Try exporting it again.".into(),
            class: ErrorClass::Input,
        },

        ImgmError::UnsupportedFormat(detail) => HumanError {
            message: "This file format isn't supported.".into(),
            suggestion: format!("Use a .bmp or .pgm file. ({detail})"),
            class: ErrorClass::Input,
        },

        // -- Processing --
        ImgmError::NotInBinaryFormat => HumanError {
            message: "The image data needs to be in binary format.".into(),
            suggestion: "Add a threshold step (-ib <value>) before -e or -d.".into(),
            class: ErrorClass::Processing,
        },

        ImgmError::InvalidDimensions { width, height } => HumanError {
            message: format!("An image can't be {width}x{height} pixels."),
            suggestion: "Use a width and height of at least 1.".into(),
            class: ErrorClass::Processing,
        },

        ImgmError::SizeMismatch { .. } | ImgmError::IndexOutOfBounds { .. } => HumanError {
            message: "The editor hit an internal error.".into(),
            suggestion: format!("Please report this problem. ({err})"),
            class: ErrorClass::Processing,
        },

        // -- Writing --
        ImgmError::ImageSave { path, .. } => HumanError {
            message: "The image couldn't be saved in the desired location.".into(),
            suggestion: format!("Check that the folder for {path} exists and is writable."),
            class: ErrorClass::Output,
        },

        // -- Front end --
        ImgmError::InvalidArgument(detail) => HumanError {
            message: "The command line couldn't be understood.".into(),
            suggestion: format!("{detail}. Run imgm --help to see the supported flags."),
            class: ErrorClass::Usage,
        },

        ImgmError::ConfigRead { path, source } => HumanError {
            message: "The configuration file couldn't be read.".into(),
            suggestion: format!("Check the --config path {path}. ({source})"),
            class: ErrorClass::Usage,
        },

        ImgmError::Config(detail) => HumanError {
            message: "The configuration file is not valid.".into(),
            suggestion: format!("Fix the JSON or remove --config. ({detail})"),
            class: ErrorClass::Usage,
        },

        ImgmError::Io(io_err) => HumanError {
            message: "There was a problem reading or writing a file.".into(),
            suggestion: format!("Try again. If this keeps happening, the disk may be full. ({io_err})"),
            class: ErrorClass::Input,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_is_input_error() {
        let err = ImgmError::FileOpen {
            path: "missing.bmp".into(),
            source: std::io::Error::from(std::io::ErrorKind::NotFound),
        };
        let human = humanize_error(&err);
        assert_eq!(human.class, ErrorClass::Input);
        assert!(human.message.contains("missing.bmp"));
    }

    #[test]
    fn not_binary_is_processing_error() {
        let human = humanize_error(&ImgmError::NotInBinaryFormat);
        assert_eq!(human.class, ErrorClass::Processing);
        assert!(human.suggestion.contains("-ib"));
    }

    #[test]
    fn save_failure_is_output_error() {
        let err = ImgmError::ImageSave {
            path: "/nope/out.pgm".into(),
            source: std::io::Error::from(std::io::ErrorKind::PermissionDenied),
        };
        assert_eq!(humanize_error(&err).exit_code(), 5);
    }

    #[test]
    fn bad_argument_is_usage_error() {
        let err = ImgmError::InvalidArgument("missing parameter for -rs".into());
        assert_eq!(humanize_error(&err).exit_code(), 2);
    }

    #[test]
    fn unreadable_config_is_usage_error() {
        let err = ImgmError::ConfigRead {
            path: "imgm.json".into(),
            source: std::io::Error::from(std::io::ErrorKind::NotFound),
        };
        let human = humanize_error(&err);
        assert_eq!(human.class, ErrorClass::Usage);
        assert_eq!(human.exit_code(), 2);
        assert!(human.suggestion.contains("imgm.json"));
    }
}

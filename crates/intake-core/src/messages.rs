//! Localized validation messages
//!
//! Templates use named placeholders (`{label}`, `{allowed}`, ...). The
//! template lookup is an exhaustive match over `ErrorKind` for every locale,
//! so a catalog can never be missing a message.

use crate::config::{DimensionBounds, Locale};
use crate::models::ErrorKind;
use crate::units::format_bytes;

/// Values substituted into a message template
///
/// Only the fields a given kind refers to need to be set; missing values
/// render as empty text or zero.
#[derive(Debug, Clone, Default)]
pub struct MessageParams<'a> {
    pub allowed_extensions: &'a [String],
    /// Zero when no ceiling is known
    pub max_file_size: u64,
    pub file_size: u64,
    pub bounds: Option<DimensionBounds>,
    pub image_width: u32,
    pub image_height: u32,
    pub filename_max_length: usize,
    pub filename_length: usize,
    pub transport_code: u16,
}

/// Message templates for one locale
#[derive(Debug, Clone, Copy)]
pub struct ErrorCatalog {
    locale: Locale,
}

impl ErrorCatalog {
    pub fn new(locale: Locale) -> Self {
        Self { locale }
    }

    pub fn locale(&self) -> Locale {
        self.locale
    }

    /// Raw template for `kind` in the catalog's locale
    pub fn template(&self, kind: ErrorKind) -> &'static str {
        match self.locale {
            Locale::En => english_template(kind),
            Locale::Fr => french_template(kind),
        }
    }

    /// Render the message for `kind`, prefixed with `label` when it is not empty
    pub fn render(&self, kind: ErrorKind, label: &str, params: &MessageParams<'_>) -> String {
        let label = if label.is_empty() {
            String::new()
        } else {
            format!("{}: ", label)
        };

        let mut message = self.template(kind).replace("{label}", &label);

        match kind {
            ErrorKind::InvalidFileExtension => {
                message = message.replace("{allowed}", &params.allowed_extensions.join(", "));
            }
            ErrorKind::FileUploadSizeTooLarge => {
                message = message
                    .replace("{max_size}", &format_bytes(params.max_file_size, self.locale))
                    .replace("{file_size}", &format_bytes(params.file_size, self.locale));
            }
            ErrorKind::FileSizeTooLarge if params.max_file_size == 0 => {
                message = self.unbounded_size_template().replace("{label}", &label);
            }
            ErrorKind::FileSizeTooLarge => {
                message =
                    message.replace("{max_size}", &format_bytes(params.max_file_size, self.locale));
            }
            ErrorKind::ImageDimensionsOutOfBounds => {
                let (width_rule, height_rule) = match params.bounds {
                    Some(bounds) => self.dimension_rules(&bounds),
                    None => (String::new(), String::new()),
                };
                message = message
                    .replace("{width_rule}", &width_rule)
                    .replace("{height_rule}", &height_rule)
                    .replace("{width}", &params.image_width.to_string())
                    .replace("{height}", &params.image_height.to_string());
            }
            ErrorKind::FilenameTooLong => {
                message = message
                    .replace("{max_length}", &params.filename_max_length.to_string())
                    .replace("{length}", &params.filename_length.to_string());
            }
            ErrorKind::UnknownError => {
                message = message.replace("{code}", &params.transport_code.to_string());
            }
            ErrorKind::FileSizeZero
            | ErrorKind::InvalidImageDimensions
            | ErrorKind::InvalidFilename
            | ErrorKind::MoveUploadedFileFailed
            | ErrorKind::FileUploadPartial
            | ErrorKind::NoFileUploaded
            | ErrorKind::MissingTemporaryFolder
            | ErrorKind::FailedWriteToDisk => {}
        }

        message
    }

    /// Transport-level size rejection when no ceiling is known to quote
    fn unbounded_size_template(&self) -> &'static str {
        match self.locale {
            Locale::En => "{label}The file upload is too large.",
            Locale::Fr => "{label}Le poids du téléchargement dépasse la limite permise.",
        }
    }

    /// Width and height requirements, phrased as a range or a single value
    fn dimension_rules(&self, bounds: &DimensionBounds) -> (String, String) {
        let width = if bounds.min_width != bounds.max_width {
            match self.locale {
                Locale::En => format!(
                    "between {}px and {}px wide",
                    bounds.min_width, bounds.max_width
                ),
                Locale::Fr => format!(
                    "entre {}px et {}px en largeur",
                    bounds.min_width, bounds.max_width
                ),
            }
        } else {
            match self.locale {
                Locale::En => format!("{}px wide", bounds.max_width),
                Locale::Fr => format!("{}px en largeur", bounds.max_width),
            }
        };

        let height = if bounds.min_height != bounds.max_height {
            match self.locale {
                Locale::En => format!(
                    "between {}px and {}px high",
                    bounds.min_height, bounds.max_height
                ),
                Locale::Fr => format!(
                    "entre {}px et {}px en hauteur",
                    bounds.min_height, bounds.max_height
                ),
            }
        } else {
            match self.locale {
                Locale::En => format!("{}px high", bounds.max_height),
                Locale::Fr => format!("{}px en hauteur", bounds.max_height),
            }
        };

        (width, height)
    }
}

fn english_template(kind: ErrorKind) -> &'static str {
    match kind {
        ErrorKind::InvalidFileExtension => {
            "{label}File uploads are restricted to only the following types: ({allowed})"
        }
        ErrorKind::FileUploadSizeTooLarge => {
            "{label}The file upload cannot exceed {max_size} in size. (Your file: {file_size})"
        }
        ErrorKind::FileSizeTooLarge => "{label}The file upload cannot exceed {max_size} in size.",
        ErrorKind::FileSizeZero => {
            "{label}The file was not uploaded because it contains zero bytes."
        }
        ErrorKind::InvalidImageDimensions => {
            "{label}The server was unable to determine the image's dimensions."
        }
        ErrorKind::ImageDimensionsOutOfBounds => {
            "{label}The image must be {width_rule} and {height_rule}. (Your image: {width}px wide by {height}px high)"
        }
        ErrorKind::InvalidFilename => {
            "{label}The name of the file you are trying to upload is invalid. File names can only contain letters, digits, underscores, hyphens, parentheses, and/or periods."
        }
        ErrorKind::FilenameTooLong => {
            "{label}The file name cannot exceed {max_length} characters. (Your file: {length} characters)"
        }
        ErrorKind::MoveUploadedFileFailed => {
            "{label}The server could not move the uploaded file from the temporary directory."
        }
        ErrorKind::FileUploadPartial => "{label}The file was only partially uploaded.",
        ErrorKind::NoFileUploaded => "{label}No file was uploaded.",
        ErrorKind::MissingTemporaryFolder => {
            "{label}A temporary folder for the uploaded file is missing."
        }
        ErrorKind::FailedWriteToDisk => "{label}The file could not be written to disk.",
        ErrorKind::UnknownError => "{label}An unhandled error occurred. (Code: {code})",
    }
}

fn french_template(kind: ErrorKind) -> &'static str {
    match kind {
        ErrorKind::InvalidFileExtension => {
            "{label}Le téléchargement de ce type de fichier n'est pas permis. (Types permis: {allowed})"
        }
        ErrorKind::FileUploadSizeTooLarge => {
            "{label}Le poids du téléchargement dépasse la limite permise de {max_size}. (Votre fichier: {file_size})"
        }
        ErrorKind::FileSizeTooLarge => {
            "{label}Le poids du téléchargement dépasse la limite permise de {max_size}."
        }
        ErrorKind::FileSizeZero => {
            "{label}Le fichier n'a pas été téléchargé parce qu'il contient zéro octet."
        }
        ErrorKind::InvalidImageDimensions => {
            "{label}Le serveur ne peut déterminer les dimensions de l'image."
        }
        ErrorKind::ImageDimensionsOutOfBounds => {
            "{label}L'image doit avoir {width_rule} et {height_rule}. (Votre image: {width}px en largeur et {height}px en hauteur)"
        }
        ErrorKind::InvalidFilename => {
            "{label}Le nom du fichier doit contenir seulement des caractères alphanumériques ou les caractères suivants: ()._-"
        }
        ErrorKind::FilenameTooLong => {
            "{label}Le nom du fichier ne doit pas contenir plus de {max_length} caractères. (Votre fichier: {length} caractères)"
        }
        ErrorKind::MoveUploadedFileFailed => {
            "{label}Le serveur n'a pu copier le fichier du dossier temporaire."
        }
        ErrorKind::FileUploadPartial => "{label}Le fichier n'a été que partiellement téléchargé.",
        ErrorKind::NoFileUploaded => "{label}Aucun fichier n'a été envoyé.",
        ErrorKind::MissingTemporaryFolder => {
            "{label}Il manque un dossier temporaire pour stocker le fichier."
        }
        ErrorKind::FailedWriteToDisk => "{label}Le fichier n'a pu être copié.",
        ErrorKind::UnknownError => {
            "{label}Une erreur inconnue est survenue lors du téléchargement. (Code: {code})"
        }
    }
}

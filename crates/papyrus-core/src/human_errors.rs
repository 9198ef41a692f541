// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Human-readable error messages for the status line.
//
// Every technical error maps to plain English plus a suggestion. The three
// error classes are kept apart so the UI can render backend failures
// differently from connectivity problems.

use crate::error::PapyrusError;

/// Which part of the pipeline an error came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Something the user gave us is missing or unusable. No request was sent.
    Input,
    /// The backend could not be reached or answered with garbage.
    Transport,
    /// The backend accepted the task and then reported it as failed.
    Backend,
}

/// A human-readable error with a plain English message and suggestion.
#[derive(Debug, Clone)]
pub struct HumanError {
    /// Plain English summary.
    pub message: String,
    /// What the user should try next.
    pub suggestion: String,
}

/// Classify an error into one of the three user-facing kinds.
pub fn error_kind(err: &PapyrusError) -> ErrorKind {
    match err {
        PapyrusError::NoImageSelected
        | PapyrusError::IncompleteSelection { .. }
        | PapyrusError::InvalidCoordinates(_)
        | PapyrusError::ImageError(_)
        | PapyrusError::InvalidTransform(_)
        | PapyrusError::InvalidConfig(_)
        | PapyrusError::Io(_) => ErrorKind::Input,

        PapyrusError::Submission(_)
        | PapyrusError::Poll(_)
        | PapyrusError::Http(_)
        | PapyrusError::Serialization(_) => ErrorKind::Transport,

        PapyrusError::TaskFailed(_) => ErrorKind::Backend,
    }
}

/// Convert a `PapyrusError` into a `HumanError`.
pub fn humanize_error(err: &PapyrusError) -> HumanError {
    let (message, suggestion): (String, String) = match err {
        PapyrusError::NoImageSelected => (
            "Please select an image file.".into(),
            "Choose a photo of the papyrus, then load it.".into(),
        ),
        PapyrusError::IncompleteSelection { count } => (
            format!("Only {count} of 4 corners are marked."),
            "Click the remaining corners of the papyrus before submitting.".into(),
        ),
        PapyrusError::InvalidCoordinates(_) => (
            "The marked corners could not be read.".into(),
            "Press Redo and mark the four corners again.".into(),
        ),
        PapyrusError::ImageError(_) | PapyrusError::InvalidTransform(_) => (
            "There's a problem with this image.".into(),
            "The file may be damaged or in an unusual format. Try a JPEG or PNG.".into(),
        ),
        PapyrusError::InvalidConfig(detail) => (
            "The settings are not valid.".into(),
            format!("Open Settings and correct the value. ({detail})"),
        ),
        PapyrusError::Io(io_err) if io_err.kind() == std::io::ErrorKind::NotFound => (
            "The file couldn't be found.".into(),
            "It may have been moved or deleted. Try choosing it again.".into(),
        ),
        PapyrusError::Io(_) => (
            "The file couldn't be read.".into(),
            "Check that the file is not open elsewhere, then try again.".into(),
        ),
        PapyrusError::Submission(_) | PapyrusError::Http(_) | PapyrusError::Serialization(_) => (
            "The retrieval service could not be reached.".into(),
            "Check the server address in Settings and your connection, then submit again.".into(),
        ),
        PapyrusError::Poll(_) => (
            "We lost track of the retrieval task.".into(),
            "Press Redo and submit the image again.".into(),
        ),
        PapyrusError::TaskFailed(_) => (
            "Task failed.".into(),
            "The service could not process this image. Try marking the corners more tightly.".into(),
        ),
    };
    HumanError {
        message,
        suggestion,
    }
}

/// One-line status text shown under the image.
///
/// Backend failures read `Task failed.`; everything else reads
/// `Error: <detail>`.
pub fn status_line(err: &PapyrusError) -> String {
    match error_kind(err) {
        ErrorKind::Backend => "Task failed.".into(),
        ErrorKind::Input | ErrorKind::Transport => format!("Error: {err}"),
    }
}

//! File acquisition for the submission form: the picker and drag-and-drop
//! channels both feed the same ordered pending list.

use tracing::debug;

const ACCEPTED_EXTENSIONS: [&str; 2] = ["pdf", "txt"];

/// A user-selected transcript file that has not been sent yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingFile {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl PendingFile {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            bytes,
        }
    }

    pub fn size_bytes(&self) -> usize {
        self.bytes.len()
    }
}

/// The filename passes iff it ends in an accepted extension, matched
/// case-insensitively after the last dot.
pub fn has_accepted_extension(name: &str) -> bool {
    let Some((_, extension)) = name.rsplit_once('.') else {
        return false;
    };
    ACCEPTED_EXTENSIONS
        .iter()
        .any(|accepted| extension.eq_ignore_ascii_case(accepted))
}

/// Pending submission input: accumulated files, the product description, and
/// the drag-active presentation flag.
///
/// Accumulation is append-only across selection events and never deduplicates
/// by name; picking the same file twice submits it twice. Files and
/// description clear together through [`UploadForm::clear`] and nowhere else.
#[derive(Debug, Default)]
pub struct UploadForm {
    files: Vec<PendingFile>,
    description: String,
    drag_active: bool,
}

impl UploadForm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends the candidates that pass the extension filter, preserving
    /// call order. Rejected candidates are dropped without surfacing an
    /// error.
    pub fn add_files<I>(&mut self, candidates: I)
    where
        I: IntoIterator<Item = PendingFile>,
    {
        for candidate in candidates {
            if has_accepted_extension(&candidate.name) {
                self.files.push(candidate);
            } else {
                debug!(name = %candidate.name, "dropping candidate with unsupported extension");
            }
        }
    }

    pub fn drag_enter(&mut self) {
        self.drag_active = true;
    }

    pub fn drag_over(&mut self) {
        self.drag_active = true;
    }

    pub fn drag_leave(&mut self) {
        self.drag_active = false;
    }

    /// Completes a drag gesture: the candidates run through [`add_files`]
    /// and the drag indicator resets even when the payload is empty or
    /// entirely filtered out.
    ///
    /// [`add_files`]: UploadForm::add_files
    pub fn drop_files<I>(&mut self, candidates: I)
    where
        I: IntoIterator<Item = PendingFile>,
    {
        self.add_files(candidates);
        self.drag_active = false;
    }

    pub fn set_description(&mut self, description: impl Into<String>) {
        self.description = description.into();
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// Mutable binding point for immediate-mode text widgets.
    pub fn description_mut(&mut self) -> &mut String {
        &mut self.description
    }

    pub fn files(&self) -> &[PendingFile] {
        &self.files
    }

    pub fn file_count(&self) -> usize {
        self.files.len()
    }

    pub fn has_files(&self) -> bool {
        !self.files.is_empty()
    }

    pub fn drag_active(&self) -> bool {
        self.drag_active
    }

    /// Empties the pending files and the description together.
    pub fn clear(&mut self) {
        self.files.clear();
        self.description.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file(name: &str) -> PendingFile {
        PendingFile::new(name, b"content".to_vec())
    }

    #[test]
    fn accumulates_accepted_files_in_call_order() {
        let mut form = UploadForm::new();
        form.add_files([file("a.txt"), file("b.pdf")]);
        form.add_files([file("c.txt")]);

        let names: Vec<&str> = form.files().iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, ["a.txt", "b.pdf", "c.txt"]);
    }

    #[test]
    fn second_selection_is_additive_and_keeps_duplicates() {
        let mut form = UploadForm::new();
        form.add_files([file("notes.txt")]);
        form.add_files([file("notes.txt")]);
        assert_eq!(form.file_count(), 2);
    }

    #[test]
    fn rejects_unsupported_extensions_silently() {
        let mut form = UploadForm::new();
        form.add_files([file("x.docx"), file("x.pdf.bak"), file("noext")]);
        assert!(!form.has_files());
    }

    #[test]
    fn extension_match_is_case_insensitive() {
        assert!(has_accepted_extension("x.PDF"));
        assert!(has_accepted_extension("x.Txt"));
        assert!(has_accepted_extension("archive.tar.pdf"));
        assert!(!has_accepted_extension("pdf"));
        assert!(!has_accepted_extension("x.pdfx"));
    }

    #[test]
    fn drop_resets_drag_indicator() {
        let mut form = UploadForm::new();
        form.drag_enter();
        form.drag_over();
        assert!(form.drag_active());

        form.drop_files([file("a.txt")]);
        assert!(!form.drag_active());
        assert_eq!(form.file_count(), 1);
    }

    #[test]
    fn drag_leave_resets_indicator_without_touching_files() {
        let mut form = UploadForm::new();
        form.add_files([file("a.txt")]);
        form.drag_enter();
        form.drag_leave();
        assert!(!form.drag_active());
        assert_eq!(form.file_count(), 1);
    }

    #[test]
    fn empty_drop_leaves_state_unchanged() {
        let mut form = UploadForm::new();
        form.add_files([file("a.txt")]);
        form.drop_files([]);
        assert_eq!(form.file_count(), 1);
    }

    #[test]
    fn clear_is_idempotent_and_clears_both_fields() {
        let mut form = UploadForm::new();
        form.add_files([file("a.txt")]);
        form.set_description("notes");

        form.clear();
        assert!(!form.has_files());
        assert!(form.description().is_empty());

        form.clear();
        assert!(!form.has_files());
        assert!(form.description().is_empty());
    }
}

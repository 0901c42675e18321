//! Session state: the ingestion boundary around parsers, grouping,
//! selection, image loading and the editor.
//!
//! One session owns the loaded image, the optional image root directory,
//! the state derived from the latest successful parse (grouping map,
//! selection, active boxes, format label, warning, preview), the viewport
//! and the editor. Derived annotation state is replaced wholesale per
//! load; a monotonically increasing load token guarantees that when loads
//! overlap, only the latest-started one may commit its result.

use std::path::{Path, PathBuf};

use crate::editor::BoxEditor;
use crate::error::BoxscopeError;
use crate::export;
use crate::formats::{self, ParseContext};
use crate::grouping::{self, GroupingMap};
use crate::model::{AnnotationBox, AnnotationFormat, AnnotationImage, ImageId};
use crate::resolve;
use crate::viewport::{NaturalPoint, ViewportMetrics};

/// Raw-document preview cap, in characters.
pub const PREVIEW_LIMIT: usize = 5_000;

/// Format label shown for files no parser handles.
pub const UNSUPPORTED_LABEL: &str = "unsupported";

/// Advisory shown when an annotation image is selected but no image file
/// is loaded.
pub const MSG_NO_IMAGE: &str = "no image loaded; load the matching image file";

/// Advisory shown when the loaded image's name differs from the selected
/// annotation image's base filename.
pub const MSG_NAME_MISMATCH: &str =
    "loaded image name does not match the selected annotation image";

/// Token identifying one annotation-load attempt.
///
/// Tokens are handed out in issue order; a load result is only committed
/// when its token is still the latest one issued.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LoadToken(u64);

/// How an annotation-load attempt ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The result replaced the derived annotation state.
    Committed,
    /// The file's extension has no parser; state was reset to empty.
    Unsupported,
    /// A newer load was started first; this result was discarded.
    Stale,
}

/// The currently loaded image file.
#[derive(Clone, Debug)]
pub struct LoadedImage {
    pub name: String,
    pub natural_width: u32,
    pub natural_height: u32,
}

/// Derived state of the latest annotation parse.
#[derive(Clone, Debug)]
pub struct AnnotationState {
    pub file_name: String,
    pub format: Option<AnnotationFormat>,
    pub warning: Option<String>,
    pub preview: String,
    pub images: Vec<AnnotationImage>,
    pub grouped: GroupingMap,
}

impl AnnotationState {
    /// The format tag surfaced to the user.
    pub fn format_label(&self) -> &str {
        self.format
            .as_ref()
            .map(AnnotationFormat::label)
            .unwrap_or(UNSUPPORTED_LABEL)
    }
}

#[derive(Debug, Default)]
pub struct Session {
    image: Option<LoadedImage>,
    image_root: Option<(PathBuf, String)>,
    annotation: Option<AnnotationState>,
    active_boxes: Vec<AnnotationBox>,
    selected_image_id: Option<ImageId>,
    selected_image_name: Option<String>,
    mismatch: Option<String>,
    viewport: ViewportMetrics,
    editor: BoxEditor,
    load_counter: u64,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    // ------------------------------------------------------------------
    // Image loading
    // ------------------------------------------------------------------

    /// Loads an image file, reading its natural dimensions from the file
    /// header. Resets the zoom and re-checks the filename-matching
    /// contract against the selected annotation image.
    pub fn load_image(&mut self, path: &Path) -> Result<(), BoxscopeError> {
        let dimensions =
            imagesize::size(path).map_err(|source| BoxscopeError::ImageRead {
                path: path.to_path_buf(),
                message: source.to_string(),
            })?;

        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| path.to_string_lossy().to_string());

        let natural_width = dimensions.width as u32;
        let natural_height = dimensions.height as u32;

        self.viewport = ViewportMetrics::new(
            (natural_width as f64, natural_height as f64),
            (self.viewport.display_width, self.viewport.display_height),
        );
        self.image = Some(LoadedImage {
            name,
            natural_width,
            natural_height,
        });
        self.refresh_mismatch();
        Ok(())
    }

    /// Registers the root directory used to resolve relative image paths.
    ///
    /// When an annotation image is already selected, resolution is
    /// attempted immediately; a miss raises the mismatch indicator without
    /// clearing the selection.
    pub fn set_image_root(&mut self, path: &Path) {
        let label = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| path.to_string_lossy().to_string());
        self.image_root = Some((path.to_path_buf(), label));
        self.mismatch = None;

        if let Some(name) = self.selected_image_name.clone() {
            self.try_load_from_root(&name);
        }
    }

    fn try_load_from_root(&mut self, file_name: &str) {
        let Some((root, label)) = self.image_root.clone() else {
            return;
        };
        let attempt = resolve::resolve_in_root(&root, Some(&label), file_name)
            .and_then(|path| self.load_image(&path));

        match attempt {
            Ok(()) => self.mismatch = None,
            Err(_) => {
                // a miss drops the image but keeps the box selection
                self.image = None;
                self.viewport = ViewportMetrics::new(
                    (0.0, 0.0),
                    (self.viewport.display_width, self.viewport.display_height),
                );
                self.mismatch = Some(format!(
                    "failed to load image. {}",
                    resolve::attempted_path(Some(&label), file_name)
                ));
            }
        }
    }

    /// Re-derives the advisory mismatch indicator from the current image
    /// and selection. Advisory only, never blocks anything.
    fn refresh_mismatch(&mut self) {
        let Some(selected) = self.selected_image_name.as_deref() else {
            self.mismatch = None;
            return;
        };
        self.mismatch = match self.image.as_ref() {
            None => Some(MSG_NO_IMAGE.to_string()),
            Some(img) if !resolve::names_match(selected, &img.name) => {
                Some(MSG_NAME_MISMATCH.to_string())
            }
            Some(_) => None,
        };
    }

    // ------------------------------------------------------------------
    // Annotation loading
    // ------------------------------------------------------------------

    /// Starts an annotation load and returns its token. Starting a new
    /// load makes every earlier token stale.
    pub fn begin_annotation_load(&mut self) -> LoadToken {
        self.load_counter += 1;
        LoadToken(self.load_counter)
    }

    /// Completes an annotation load.
    ///
    /// Stale tokens are discarded without touching state. Structural
    /// JSON/XML errors clear all derived annotation state and propagate;
    /// degraded parses commit with their warning attached.
    pub fn finish_annotation_load(
        &mut self,
        token: LoadToken,
        file_name: &str,
        raw_text: &str,
    ) -> Result<LoadOutcome, BoxscopeError> {
        if token.0 != self.load_counter {
            return Ok(LoadOutcome::Stale);
        }

        self.mismatch = None;
        let ctx = ParseContext {
            natural_size: self
                .image
                .as_ref()
                .map(|img| (img.natural_width, img.natural_height)),
            image_name: self.image.as_ref().map(|img| img.name.as_str()),
        };

        let result = match formats::parse_file(file_name, raw_text, ctx) {
            Ok(result) => result,
            Err(err) => {
                self.clear_annotation_state();
                return Err(err);
            }
        };

        let Some(result) = result else {
            // unsupported extension: empty, unselected state with a
            // distinct label rather than an error
            self.clear_annotation_state();
            self.annotation = Some(AnnotationState {
                file_name: file_name.to_string(),
                format: None,
                warning: None,
                preview: String::new(),
                images: Vec::new(),
                grouped: GroupingMap::new(),
            });
            return Ok(LoadOutcome::Unsupported);
        };

        let grouped = grouping::group_boxes(&result.boxes);
        let first_image = result.images.first().cloned();

        self.annotation = Some(AnnotationState {
            file_name: file_name.to_string(),
            format: Some(result.format),
            warning: result.warning.clone(),
            preview: preview_of(raw_text),
            images: result.images.clone(),
            grouped: grouped.clone(),
        });

        match first_image {
            Some(first) => {
                self.selected_image_id = Some(first.id);
                self.selected_image_name = Some(first.file_name.clone());
                self.active_boxes = grouped.get(&first.id).cloned().unwrap_or_default();

                if self.image_root.is_some() {
                    self.try_load_from_root(&first.file_name);
                } else {
                    self.refresh_mismatch();
                }
            }
            None => {
                // no image grouping: one ungrouped, always-selected set
                self.selected_image_id = None;
                self.selected_image_name = None;
                self.active_boxes = result.boxes;
            }
        }

        Ok(LoadOutcome::Committed)
    }

    /// Convenience wrapper for non-overlapping loads.
    pub fn load_annotation(
        &mut self,
        file_name: &str,
        raw_text: &str,
    ) -> Result<LoadOutcome, BoxscopeError> {
        let token = self.begin_annotation_load();
        self.finish_annotation_load(token, file_name, raw_text)
    }

    fn clear_annotation_state(&mut self) {
        self.annotation = None;
        self.active_boxes.clear();
        self.selected_image_id = None;
        self.selected_image_name = None;
        self.editor.pointer_up();
    }

    // ------------------------------------------------------------------
    // Selection
    // ------------------------------------------------------------------

    /// Switches the active image, swapping in its box bucket and
    /// attempting to load the matching image file. A failed load only
    /// raises the mismatch indicator; the box selection stays.
    pub fn select_image(&mut self, image_id: ImageId) {
        let Some(annotation) = self.annotation.as_ref() else {
            return;
        };
        let Some(item) = annotation.images.iter().find(|img| img.id == image_id) else {
            return;
        };
        let file_name = item.file_name.clone();

        self.selected_image_id = Some(image_id);
        self.selected_image_name = Some(file_name.clone());
        self.active_boxes = annotation
            .grouped
            .get(&image_id)
            .cloned()
            .unwrap_or_default();
        self.editor.pointer_up();

        if self.image_root.is_some() {
            self.try_load_from_root(&file_name);
        } else {
            self.refresh_mismatch();
        }
    }

    // ------------------------------------------------------------------
    // Editing
    // ------------------------------------------------------------------

    pub fn editor(&self) -> &BoxEditor {
        &self.editor
    }

    pub fn editor_mut(&mut self) -> &mut BoxEditor {
        &mut self.editor
    }

    pub fn viewport(&self) -> &ViewportMetrics {
        &self.viewport
    }

    pub fn viewport_mut(&mut self) -> &mut ViewportMetrics {
        &mut self.viewport
    }

    /// Feeds a pointer-move into the editor and, if a gesture is active,
    /// replaces the active box collection with the emitted snapshot.
    pub fn apply_pointer_move(&mut self, pointer: NaturalPoint) -> bool {
        match self.editor.pointer_move(&self.active_boxes, pointer) {
            Some(snapshot) => {
                self.active_boxes = snapshot;
                true
            }
            None => false,
        }
    }

    // ------------------------------------------------------------------
    // Export
    // ------------------------------------------------------------------

    /// The canonical export document for the active box set, or `None`
    /// when exporting would be a no-op.
    pub fn export_document(&self) -> Option<String> {
        let image = self.image.as_ref()?;
        export::export_coco_text(
            &self.active_boxes,
            Some(&image.name),
            Some((image.natural_width, image.natural_height)),
        )
    }

    /// Suggested file name for the export document.
    pub fn export_file_name(&self) -> Option<String> {
        self.image
            .as_ref()
            .map(|img| export::export_file_name(&img.name))
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    pub fn image(&self) -> Option<&LoadedImage> {
        self.image.as_ref()
    }

    pub fn annotation(&self) -> Option<&AnnotationState> {
        self.annotation.as_ref()
    }

    pub fn active_boxes(&self) -> &[AnnotationBox] {
        &self.active_boxes
    }

    pub fn selected_image_id(&self) -> Option<ImageId> {
        self.selected_image_id
    }

    pub fn mismatch(&self) -> Option<&str> {
        self.mismatch.as_deref()
    }

    /// Box count for one annotation image, for listings.
    pub fn box_count(&self, image_id: ImageId) -> usize {
        self.annotation
            .as_ref()
            .map(|a| grouping::box_count(&a.grouped, image_id))
            .unwrap_or(0)
    }
}

/// Raw-document preview: JSON is re-pretty-printed, everything else is
/// shown verbatim; both truncated at [`PREVIEW_LIMIT`] characters.
fn preview_of(raw_text: &str) -> String {
    let formatted = serde_json::from_str::<serde_json::Value>(raw_text)
        .and_then(|value| serde_json::to_string_pretty(&value))
        .unwrap_or_else(|_| raw_text.to_string());

    if formatted.chars().count() > PREVIEW_LIMIT {
        let truncated: String = formatted.chars().take(PREVIEW_LIMIT).collect();
        format!("{truncated}\n...")
    } else {
        formatted
    }
}

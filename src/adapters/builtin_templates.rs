use include_dir::{Dir, DirEntry, include_dir};

use crate::domain::template::TEMPLATE_SUFFIX;
use crate::ports::{TemplateCatalog, TemplateFile};

static TEMPLATES_DIR: Dir = include_dir!("$CARGO_MANIFEST_DIR/src/assets/templates/agents");

/// Agent templates compiled into the binary.
#[derive(Debug, Clone, Default)]
pub struct EmbeddedTemplateCatalog;

impl EmbeddedTemplateCatalog {
    pub fn new() -> Self {
        Self
    }
}

impl TemplateCatalog for EmbeddedTemplateCatalog {
    fn builtin_templates(&self) -> Vec<TemplateFile> {
        let mut files = Vec::new();
        collect_files(&TEMPLATES_DIR, &mut files);
        files.sort_by(|a, b| a.origin.cmp(&b.origin));
        files
    }
}

fn collect_files(dir: &'static Dir, files: &mut Vec<TemplateFile>) {
    for entry in dir.entries() {
        match entry {
            DirEntry::File(file) => {
                let origin = file.path().to_string_lossy().to_string();
                if !origin.ends_with(TEMPLATE_SUFFIX) {
                    continue;
                }
                if let Some(content) = file.contents_utf8() {
                    files.push(TemplateFile { origin, content: content.to_string() });
                }
            }
            DirEntry::Dir(subdir) => collect_files(subdir, files),
        }
    }
}

//! Markdown report rendering

use crate::models::ConversionReport;

pub fn generate_markdown_report(report: &ConversionReport) -> String {
    let mut out = String::new();

    out.push_str("# Chrome to Firefox Extension Conversion Report\n\n");

    // Summary
    out.push_str("## Summary\n\n");
    out.push_str(&format!("- **Extension**: {}\n", report.extension_name));
    out.push_str(&format!("- **Manifest Version**: {}\n", report.manifest_version));
    out.push_str(&format!("- **Files Modified**: {}\n", report.modified_files.len()));
    out.push_str(&format!("- **Warnings**: {}\n\n", report.warnings.len()));

    if !report.modified_files.is_empty() {
        out.push_str("## Modified Files\n\n");
        for file in &report.modified_files {
            out.push_str(&format!("- `{}`\n", file.display()));
        }
        out.push('\n');
    }

    if !report.warnings.is_empty() {
        out.push_str("## ⚠️ Warnings\n\n");
        for warning in &report.warnings {
            out.push_str(&format!("- {}\n", warning));
        }
        out.push('\n');
    }

    // Next Steps
    out.push_str("## Next Steps\n\n");
    out.push_str("1. Review the converted extension files\n");
    out.push_str("2. Load the extension in Firefox via about:debugging\n");
    out.push_str("3. Check every file listed under warnings by hand\n");

    out
}

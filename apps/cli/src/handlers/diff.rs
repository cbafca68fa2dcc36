use crate::services::io::{read_json, write_json, write_line};
use anyhow::{Context, Result};
use c3dp_codec::FlatCodec;
use c3dp_editor::{ConfigSession, NO_CHANGES, SaveOutcome};
use std::path::Path;

/// Prints the save request for an edited config, or a note that nothing changed.
///
/// # Errors
/// Returns an error if either file cannot be read or the session rejects them.
pub fn diff(
    codec: FlatCodec,
    baseline: &Path,
    edited: &Path,
    edited_is_flat: bool,
    pretty: bool,
) -> Result<()> {
    let device = read_json(Some(baseline))?;
    let edited = read_json(Some(edited))?;

    let mut session = ConfigSession::new(codec);
    session.init(device).context("Failed to adopt the baseline")?;

    let tree = if edited_is_flat { session.codec().unflatten(edited) } else { edited };

    match session.save(&tree).context("Failed to compare the edited config")? {
        SaveOutcome::Unchanged => write_line(NO_CHANGES),
        SaveOutcome::Changed(update) => write_json(&update.form_value(), pretty),
    }
}

//! Implementation of the `bsrs list` command.
//!
//! Prints the template registry grouped by phase and theme, in declared
//! order. With `--placeholders`, each template's placeholders are listed and
//! keys that would not resolve are flagged.

use crate::cli::ListArgs;
use crate::config::{ProjectConfig, SystemConfig};
use crate::context::Workspace;
use crate::error::{BsrsError, Result};
use crate::prompt::{BUILTIN_VARS, apply_fallbacks, placeholders};
use crate::registry::TemplateRegistry;

/// Execute the `bsrs list` command.
pub fn cmd_list(ws: &Workspace, args: ListArgs) -> Result<()> {
    let registry = ws.registry()?;
    let project = if args.placeholders {
        Some(ws.load_project()?)
    } else {
        None
    };

    print!("{}", render_listing(&ws.system, &registry, project.as_ref())?);
    Ok(())
}

/// Render the registry listing.
pub(crate) fn render_listing(
    system: &SystemConfig,
    registry: &TemplateRegistry,
    project: Option<&ProjectConfig>,
) -> Result<String> {
    let known = project.map(|p| apply_fallbacks(p.values(), &system.placeholder_fallbacks));
    let mut out = String::new();

    for phase_id in registry.phases() {
        let label = system.phase(phase_id).map(|p| p.label.as_str()).unwrap_or_default();
        out.push_str(&format!("{}  {}\n", phase_id, label));

        for entry in registry.entries_for_phase(phase_id) {
            let name = system
                .theme(&entry.phase, &entry.theme)
                .map(|t| t.name.as_str())
                .unwrap_or_default();
            out.push_str(&format!("  {:<12} {}\n", entry.target(), name));

            let Some(known) = &known else {
                continue;
            };
            let text = std::fs::read_to_string(&entry.path).map_err(|e| {
                BsrsError::UserError(format!(
                    "failed to read template '{}': {}",
                    entry.path.display(),
                    e
                ))
            })?;
            let names = placeholders(&text).map_err(|e| BsrsError::TemplateSyntax {
                path: entry.path.clone(),
                message: e.to_string(),
            })?;
            let rendered: Vec<String> = names
                .iter()
                .map(|n| {
                    let resolvable = BUILTIN_VARS.contains(&n.as_str()) || known.contains_key(n);
                    if resolvable {
                        n.clone()
                    } else {
                        format!("{} (missing)", n)
                    }
                })
                .collect();
            if !rendered.is_empty() {
                out.push_str(&format!("               placeholders: {}\n", rendered.join(", ")));
            }
        }
    }

    Ok(out)
}

//! Resolve command: link boundary regions to disaster-database regions.

use anyhow::{Context, Result};
use tracing::{info, info_span, warn};

use hmhews_io::{write_json, write_overrides};

use crate::cli::ResolveArgs;
use crate::config::HmhewsConfig;
use crate::pipeline;

pub fn run(args: ResolveArgs) -> Result<()> {
    let _cmd = info_span!("resolve").entered();
    let config = HmhewsConfig::load(&args.config)?;

    let rows = pipeline::read_export(&config)?;
    let identities = pipeline::resolve_identities(&config, &rows)?;
    let table = &identities.table;
    let counts = table.counts();

    info!(
        boundary = identities.boundary.len(),
        disaster = identities.disaster.len(),
        linked = counts.linked(),
        unresolved = counts.unresolved(),
        "identity table built"
    );
    println!(
        "{} of {} boundary regions linked ({} exact, {} normalized, {} override); \
         {} unresolved ({} no match, {} ambiguous, {} by override)",
        counts.linked(),
        table.len(),
        counts.exact_name,
        counts.normalized_name,
        counts.manual_override,
        counts.unresolved(),
        counts.no_match,
        counts.ambiguous,
        counts.manual_unresolved,
    );

    if let Some(ref path) = args.template {
        let template = table.override_template();
        if template.is_empty() {
            warn!("every region is linked; template is empty");
        }
        write_overrides(path, &template)
            .with_context(|| format!("failed to write override template: {}", path.display()))?;
    }
    if let Some(ref path) = args.output {
        write_json(path, table)
            .with_context(|| format!("failed to write identity table: {}", path.display()))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;

    #[test]
    fn template_lists_unmatched_regions() {
        let project = fixtures::project();
        let template = project.path("overrides.toml");
        run(ResolveArgs {
            config: project.config.clone(),
            template: Some(template.clone()),
            output: Some(project.path("identities.json")),
        })
        .unwrap();

        let overrides = hmhews_io::read_overrides(&template).unwrap();
        assert_eq!(overrides.len(), 1);
        assert!(overrides.get("IDN.12.9_1").is_some());
        assert!(project.path("identities.json").exists());
    }
}

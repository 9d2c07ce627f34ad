use crate::support::{EXIT_FAULT, exit_with};
use sketchlint_rules::builtin_registry;

pub fn run(json_output: bool) {
    let registry = builtin_registry()
        .unwrap_or_else(|err| exit_with(EXIT_FAULT, format!("invalid rule registry: {err}")));

    if json_output {
        match serde_json::to_string_pretty(&registry.registry_json()) {
            Ok(rendered) => println!("{rendered}"),
            Err(err) => exit_with(EXIT_FAULT, format!("failed to render rule listing: {err}")),
        }
        return;
    }

    println!("sketchlint rules ({} total)", registry.len());
    for rule in registry.listing() {
        let applies: Vec<&str> = rule.applies_to.iter().map(|pt| pt.as_str()).collect();
        println!(
            "  {:<6} {:<18} {:<14} {}/{}/{}  {}",
            rule.id.as_str(),
            rule.category,
            applies.join(","),
            rule.levels.permissive,
            rule.levels.specification,
            rule.levels.strict,
            rule.brief
        );
    }
}

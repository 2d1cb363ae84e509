use super::{json_pretty, EXIT_SUCCESS};
use adapt_aptfile::parse_file;
use adapt_plan::{Plan, PlanConfig};
use std::path::Path;

pub fn run(aptfile: &Path, config_path: Option<&Path>, json: bool) -> Result<u8, String> {
    let config = PlanConfig::resolve(config_path).map_err(|e| e.to_string())?;
    let directives = parse_file(aptfile).map_err(|e| e.to_string())?;
    let plan = Plan::from_directives(&directives, &config);

    if json {
        println!("{}", json_pretty(&plan)?);
    } else if plan.is_empty() {
        println!("nothing to do");
    } else {
        for (i, action) in plan.actions.iter().enumerate() {
            println!("{:>3}. {action}", i + 1);
        }
    }
    Ok(EXIT_SUCCESS)
}

//! A subcommand making sure the configuration and the data are fine, without
//! starting the server.

use crate::{
    args::{self, Args},
    data::{resolve, SampleData},
    load_config_and_init_logger,
    prelude::*,
};


pub(crate) fn run(shared: &args::Shared, args: &Args) -> Result<()> {
    let config = load_config_and_init_logger(shared, args)
        .context("failed to load config: cannot proceed with `check` command")?;

    info!("Starting to verify various things...");
    let data = SampleData::from_config(&config.data);
    let resolution = data.as_ref()
        .map_err(|_| anyhow!("data could not be loaded"))
        .and_then(check_resolution);
    info!("Done verifying various things");

    // Print summary after all log output
    let mut any_errors = false;
    println!();
    bunt::println!("{$bold+blue+intense}Summary{/$}");
    println!();
    print_outcome(&mut any_errors, "Load configuration", &Ok(()));
    print_outcome(&mut any_errors, "Load data", &data);
    print_outcome(&mut any_errors, "Resolve all records to GraphQL types", &resolution);

    println!();
    if any_errors {
        bunt::println!("{$red+intense}➡  Errors have occured!{/$}");
        std::process::exit(1);
    } else {
        bunt::println!("{$green+intense}⮕  Everything OK{/$}");
        Ok(())
    }
}

/// Checks that every record and every fancy payload can be resolved to one of
/// the GraphQL types.
fn check_resolution(data: &SampleData) -> Result<()> {
    let mut unresolved = Vec::new();
    for record in data.records() {
        if resolve::resolve_field_type(record).is_none() {
            unresolved.push(format!("record '{}' (value {})", record.id, record.value));
        }
    }
    for fancy in data.fancy_records() {
        if resolve::resolve_fancy_type(&fancy.ty).is_none() {
            unresolved.push(format!("fancy payload of '{}' (value {})", fancy.id, fancy.ty.value));
        }
    }

    if !unresolved.is_empty() {
        bail!("cannot resolve to any type: {}", unresolved.join(", "));
    }

    Ok(())
}

fn print_outcome<T>(any_errors: &mut bool, label: &str, result: &Result<T>) {
    match result {
        Ok(_) => {
            bunt::println!(" ▸ {[bold+intense]}  {$green+bold}✔ ok{/$}", label);
        }
        Err(e) => {
            *any_errors = true;
            bunt::println!(" ▸ {[bold+intense]}  {$red+bold}✘ error{/$}", label);
            bunt::println!("      {$red}▶▶▶ {$bold}Error:{/$}{/$} {[yellow+intense]}", e);
            println!();

            if e.chain().len() > 1 {
                bunt::println!("      {$red+italic}Caused by:{/$}");
            }
            for (i, cause) in e.chain().skip(1).enumerate() {
                print!("       {: >1$}", "", i * 2);
                println!("‣ {cause}");
            }
            println!();
        }
    }
}

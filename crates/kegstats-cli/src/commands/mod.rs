pub mod bac;
pub mod config;
pub mod drinker;
pub mod keg;
pub mod leaders;
pub mod pour;
pub mod rating;
pub mod sessions;
pub mod stats;

/// Print a value as pretty JSON on stdout.
pub(crate) fn print_json<T: serde::Serialize>(value: &T) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

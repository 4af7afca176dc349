use chrono::NaiveDate;
use clap::Args;
use staybook::config::AppConfig;
use staybook::error::AppError;
use staybook::workflows::packages::{
    quote_stay, CatalogSnapshot, Entitlement, PackageRates, QuoteRequest, QuotedPackage,
    StayQuote,
};
use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

#[derive(Args, Debug, Default)]
pub(crate) struct QuoteArgs {
    /// Number of nights; takes precedence over --from/--to
    #[arg(long)]
    pub(crate) nights: Option<i64>,
    /// Check-in date (YYYY-MM-DD)
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) from: Option<NaiveDate>,
    /// Check-out date (YYYY-MM-DD)
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) to: Option<NaiveDate>,
    /// Guest entitlement: none, standard or pro
    #[arg(long, default_value = "none")]
    pub(crate) entitlement: Entitlement,
    /// Include add-on packages in the eligible list
    #[arg(long)]
    pub(crate) include_addons: bool,
    /// Prefer a hosted package as the primary pick when one is eligible
    #[arg(long)]
    pub(crate) prefer_hosted: bool,
    /// Nightly base rate (defaults to APP_DEFAULT_BASE_RATE)
    #[arg(long)]
    pub(crate) base_rate: Option<f64>,
    /// JSON file holding a package catalog to use instead of the standard one
    #[arg(long)]
    pub(crate) catalog: Option<PathBuf>,
    /// Print the quote as JSON
    #[arg(long)]
    pub(crate) json: bool,
}

pub(crate) fn run_quote(args: QuoteArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let (catalog, custom) = load_catalog(args.catalog.as_ref())?;

    let request = QuoteRequest {
        nights: args.nights,
        from_date: args.from,
        to_date: args.to,
        base_rate: args.base_rate,
        base_rate_override: None,
        entitlement: Some(args.entitlement),
        include_addons: args.include_addons,
        prefer_hosted: args.prefer_hosted,
    };
    let quote = quote_stay(
        &catalog,
        &config.pricing.calculator(),
        &request,
        args.entitlement,
        &PackageRates::new(),
    );

    if args.json {
        let rendered = serde_json::to_string_pretty(&quote).map_err(std::io::Error::other)?;
        println!("{rendered}");
    } else {
        print!("{}", render_quote(&quote, custom));
    }
    Ok(())
}

fn load_catalog(path: Option<&PathBuf>) -> Result<(CatalogSnapshot, bool), AppError> {
    match path {
        Some(path) => {
            let reader = BufReader::new(File::open(path)?);
            Ok((CatalogSnapshot::from_json_reader(reader)?, true))
        }
        None => Ok((CatalogSnapshot::standard(), false)),
    }
}

pub(crate) fn render_quote(quote: &StayQuote, custom_catalog: bool) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "Stay quote: {} night(s) at {:.2}/night, entitlement {}{}\n",
        quote.nights,
        quote.base_rate,
        quote.entitlement.label(),
        if custom_catalog { " (custom catalog)" } else { "" }
    ));
    out.push_str(&format!("Base total: {:.2}\n", quote.base_total));

    if quote.packages.is_empty() {
        out.push_str("No packages cover this stay.\n");
        return out;
    }

    out.push_str("\nEligible packages\n");
    for quoted in &quote.packages {
        out.push_str(&package_line(quoted));
    }

    if let Some(primary) = &quote.primary {
        out.push_str(&format!(
            "\nRecommended: {} ({:.2})\n",
            primary.package.title, primary.display_total
        ));
    }
    out
}

fn package_line(quoted: &QuotedPackage) -> String {
    format!(
        "  - {:<24} {:>10.2}  {:<9} [{}]\n",
        quoted.package.title,
        quoted.display_total,
        quoted.adjustment_label,
        quoted.package.category.label()
    )
}

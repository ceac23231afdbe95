//! Subcommand handlers

use crate::config::AppConfig;
use crate::{render, AllergenCommand, Command, SettingsCommand};
use anyhow::{bail, Context, Result};
use nutriguard_classifiers::{AllergenCatalog, ProductReport, ProductScreener};
use nutriguard_client::{all_categories, find_category, OpenFoodFactsClient, ProductSource};
use nutriguard_store::{JsonFileStore, PreferenceStore, Settings};
use serde::Serialize;
use tracing::{debug, info, warn};

/// Execute a parsed command
pub async fn run(command: Command, config: &AppConfig, json: bool) -> Result<()> {
    let settings = Settings::new(JsonFileStore::new(config.preferences_path()));

    match command {
        Command::Scan { code } => {
            let client = OpenFoodFactsClient::new(&config.client_config())?;
            let screener = ProductScreener::from_config(&config.classifiers)?;
            let report = scan(&client, &screener, &settings, &code).await?;
            if json {
                print_json(&report)?;
            } else {
                print!("{}", render::report(&report));
            }
        }

        Command::Search { query, limit } => {
            let client = OpenFoodFactsClient::new(&config.client_config())?;
            let screener = ProductScreener::from_config(&config.classifiers)?;
            let reports = search(&client, &screener, &settings, &query, limit).await?;
            print_listing(&reports, json, &format!("No products found for '{}'", query.trim()))?;
        }

        Command::Browse { category: None } => {
            if json {
                print_json(&all_categories().collect::<Vec<_>>())?;
            } else {
                print!("{}", render::category_list());
            }
        }

        Command::Browse {
            category: Some(category),
        } => {
            let client = OpenFoodFactsClient::new(&config.client_config())?;
            let screener = ProductScreener::from_config(&config.classifiers)?;
            let reports = browse(&client, &screener, &settings, &category).await?;
            if !json {
                let title = find_category(&category).map_or(category.trim(), |c| c.name);
                println!("Popular in {}:", title);
            }
            print_listing(&reports, json, "No products found in this category")?;
        }

        Command::Trending => {
            let client = OpenFoodFactsClient::new(&config.client_config())?;
            let screener = ProductScreener::from_config(&config.classifiers)?;
            let reports = trending(&client, &screener, &settings).await?;
            print_listing(&reports, json, "No trending products")?;
        }

        Command::Allergens(command) => {
            let output = allergens(&settings, &config.classifiers.allergens, command)?;
            print!("{}", output);
        }

        Command::Settings(SettingsCommand::Show) => {
            let general = settings.general()?;
            if json {
                print_json(&general)?;
            } else {
                print!("{}", render::general(&general));
            }
        }

        Command::Settings(SettingsCommand::Set {
            notifications,
            scan_sound,
            high_contrast,
        }) => {
            let mut general = settings.general()?;
            if let Some(value) = notifications {
                general.notifications_enabled = value;
            }
            if let Some(value) = scan_sound {
                general.scan_sound_enabled = value;
            }
            if let Some(value) = high_contrast {
                general.high_contrast_mode = value;
            }
            settings.set_general(&general)?;
            print!("{}", render::general(&general));
        }

        Command::Reset { yes } => {
            if !yes {
                bail!("Resetting clears all preferences; pass --yes to confirm");
            }
            settings.reset()?;
            println!("All preferences cleared");
        }
    }

    Ok(())
}

/// Look up one barcode and screen it against the stored preferences
pub async fn scan<P, S>(
    source: &P,
    screener: &ProductScreener,
    settings: &Settings<S>,
    code: &str,
) -> Result<ProductReport>
where
    P: ProductSource,
    S: PreferenceStore,
{
    let product = source
        .fetch_by_code(code)
        .await
        .with_context(|| format!("Failed to fetch product {} from {}", code, source.name()))?;

    if product.is_none() {
        info!(code, "product not found");
    }

    Ok(screener.screen(product.as_ref(), &settings.snapshot()))
}

/// Search by name and screen up to `limit` results
pub async fn search<P, S>(
    source: &P,
    screener: &ProductScreener,
    settings: &Settings<S>,
    query: &str,
    limit: usize,
) -> Result<Vec<ProductReport>>
where
    P: ProductSource,
    S: PreferenceStore,
{
    let mut products = source
        .search_by_name(query)
        .await
        .with_context(|| format!("Failed to search {} for '{}'", source.name(), query))?;

    debug!(found = products.len(), limit, "search complete");
    products.truncate(limit);

    Ok(screener.screen_all(&products, &settings.snapshot()))
}

/// Screen the most popular products in a category
pub async fn browse<P, S>(
    source: &P,
    screener: &ProductScreener,
    settings: &Settings<S>,
    category: &str,
) -> Result<Vec<ProductReport>>
where
    P: ProductSource,
    S: PreferenceStore,
{
    if find_category(category).is_none() {
        debug!(category, "not a built-in category, querying as a raw tag");
    }

    let products = source
        .browse_category(category)
        .await
        .with_context(|| format!("Failed to browse {} category '{}'", source.name(), category))?;

    debug!(found = products.len(), category, "browse complete");
    Ok(screener.screen_all(&products, &settings.snapshot()))
}

/// Screen the most popular products overall
pub async fn trending<P, S>(
    source: &P,
    screener: &ProductScreener,
    settings: &Settings<S>,
) -> Result<Vec<ProductReport>>
where
    P: ProductSource,
    S: PreferenceStore,
{
    let products = source
        .trending()
        .await
        .with_context(|| format!("Failed to load trending products from {}", source.name()))?;

    Ok(screener.screen_all(&products, &settings.snapshot()))
}

/// Apply an allergen command and describe the result
pub fn allergens<S: PreferenceStore>(
    settings: &Settings<S>,
    catalog: &AllergenCatalog,
    command: AllergenCommand,
) -> Result<String> {
    let output = match command {
        AllergenCommand::List => render::allergen_list(catalog, &settings.load()?),

        AllergenCommand::Toggle { id } => {
            let custom = settings.custom_allergens()?;
            let name = match catalog.resolve(&id, &custom) {
                Some(name) => name.to_string(),
                // Stale selections stay removable
                None if settings.selected()?.contains(&id) => {
                    warn!(allergen = %id, "removing selection with no catalog entry");
                    id.clone()
                }
                None => bail!("Unknown allergen '{}'", id),
            };
            if settings.toggle_allergen(&id)? {
                format!("Selected {}\n", name)
            } else {
                format!("Unselected {}\n", name)
            }
        }

        AllergenCommand::Add { name } => match settings.add_custom_allergen(&name)? {
            Some(entry) => format!("Added {} as {}\n", entry.name, entry.id),
            None => bail!("Allergen name cannot be blank"),
        },

        AllergenCommand::Remove { id } => {
            if !settings.remove_custom_allergen(&id)? {
                bail!("No custom allergen with id '{}'", id);
            }
            format!("Removed {}\n", id)
        }

        AllergenCommand::Severity { id, level } => {
            let custom = settings.custom_allergens()?;
            if catalog.resolve(&id, &custom).is_none() {
                bail!("Unknown allergen '{}'", id);
            }
            settings.set_severity(&id, level)?;
            format!("Severity for {} set to {}\n", id, level)
        }
    };

    Ok(output)
}

fn print_listing(reports: &[ProductReport], json: bool, empty: &str) -> Result<()> {
    if json {
        return print_json(&reports);
    }
    if reports.is_empty() {
        println!("{}", empty);
    }
    for report in reports {
        println!("{}", render::summary_line(report));
    }
    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

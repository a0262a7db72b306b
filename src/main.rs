use std::path::{Path, PathBuf};

use clap::Parser;
use kb_indexer::{
    candidates::{self, CandidateFilter},
    classify::Classifier,
    error::{self, Error},
    front_matter::SerializeOptions,
    index,
    rewrite::{self, Outcome},
    site::SiteRoot,
    site_config::SiteConfig,
    taxonomy::{self, TaxonomyDefinition},
    walker,
};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

mod cli;

use cli::{Cli, ClassifyArgs, Command, IndexArgs, ReportArgs, SyncOrderArgs};

fn init_tracing(verbose: u8, quiet: bool) {
    let filter = if let Ok(env) = std::env::var("KB_INDEXER_LOG") {
        EnvFilter::new(env)
    } else if quiet {
        EnvFilter::new("warn")
    } else {
        match verbose {
            0 => EnvFilter::new("info"),
            1 => EnvFilter::new("debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .without_time()
        .init();
}

fn main() -> error::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet);

    if let Command::Completions(args) = &cli.command {
        args.generate();
        return Ok(());
    }

    let site = SiteRoot::resolve(cli.root.as_deref())?;

    match cli.command {
        Command::Classify(args) => cmd_classify(&site, &args)?,
        Command::SyncOrder(args) => cmd_sync_order(&site, &args)?,
        Command::Index(args) => cmd_index(&site, &args)?,
        Command::Report(args) => cmd_report(&site, &args)?,
        Command::Completions(_) => {}
    }

    Ok(())
}

/// Resolve a user-supplied path against the site root.
fn site_path(
    site: &SiteRoot,
    path: Option<&Path>,
    default: PathBuf,
) -> PathBuf {
    path.map(|p| site.root().join(p)).unwrap_or(default)
}

fn cmd_classify(site: &SiteRoot, args: &ClassifyArgs) -> error::Result<()> {
    let config = SiteConfig::load(&site.config_file())?;
    let mut classifier = Classifier::new(config.settings.policy.clone())?;

    // An explicit taxonomy must exist; the default one is optional.
    let taxonomy_file =
        site_path(site, args.taxonomy.as_deref(), site.taxonomy_file());
    if args.taxonomy.is_some() || taxonomy_file.is_file() {
        let weights = TaxonomyDefinition::load(&taxonomy_file)?.weights();
        classifier = classifier.with_weights(weights);
    }

    let filter = CandidateFilter::markdown()?;
    let paths =
        filter.select(site.root(), candidates::raw_candidates(&args.paths));
    if paths.is_empty() {
        eprintln!("No markdown files to classify.");
        return Ok(());
    }

    let options = SerializeOptions {
        strip_leading_blank_lines: args.strip_blank_lines,
    };
    let mut rewritten = 0;
    for path in &paths {
        let shown = site.relative(path).display();
        let outcome = classifier.process_file(path, options)?;
        let Some(report) = outcome.report() else {
            continue;
        };

        let status = if outcome.was_rewritten() {
            rewritten += 1;
            "updated"
        } else {
            "unchanged"
        };
        let mut line = format!(
            "Classified {shown}: {}/{} ({status})",
            report.category, report.subcategory
        );
        if !report.harvested.is_empty() {
            line.push_str(&format!(
                ", keywords: {}",
                report.harvested.join(", ")
            ));
        }
        if let Some(change) = &report.order {
            line.push_str(&format!(", {change}"));
        }
        println!("{line}");
    }

    info!(candidates = paths.len(), rewritten, "classification finished");
    Ok(())
}

fn cmd_sync_order(site: &SiteRoot, args: &SyncOrderArgs) -> error::Result<()> {
    let taxonomy_file =
        site_path(site, args.taxonomy.as_deref(), site.taxonomy_file());
    let weights = TaxonomyDefinition::load(&taxonomy_file)?.weights();
    if weights.is_empty() {
        warn!(path = %taxonomy_file.display(), "taxonomy defines no weights");
    }

    let dir = site.root().join(&args.dir);
    if !dir.is_dir() {
        return Err(Error::NotFound {
            kind: "directory",
            name: dir.display().to_string(),
        });
    }

    for file in walker::discover_markdown(&dir)? {
        let outcome = rewrite::rewrite_if_changed(
            &file.path,
            SerializeOptions::default(),
            |doc| Ok(taxonomy::reconcile_order(&mut doc.metadata, &weights)),
        )?;
        if let Outcome::Rewritten(Some(change)) = outcome {
            let shown = site.relative(&file.path).display();
            println!("Updating {shown}: {change}");
        }
    }
    Ok(())
}

fn cmd_index(site: &SiteRoot, args: &IndexArgs) -> error::Result<()> {
    let config = SiteConfig::load(&site.config_file())?;
    let excerpt_limit =
        args.excerpt_limit.unwrap_or(config.settings.excerpt_limit);
    let output =
        site_path(site, args.output.as_deref(), site.search_index_file());

    let index = index::generate(site, &config, excerpt_limit, &output)?;
    println!(
        "Generated search index with {} documents -> {}",
        index.document_count,
        output.display()
    );
    Ok(())
}

fn cmd_report(site: &SiteRoot, args: &ReportArgs) -> error::Result<()> {
    let taxonomy_file =
        site_path(site, args.taxonomy.as_deref(), site.taxonomy_file());
    let definition = TaxonomyDefinition::load(&taxonomy_file)?;
    let config = SiteConfig::load(&site.config_file())?;
    let documents = index::collect_site_documents(site, &config)?;

    let report = taxonomy::populated_subcategories(
        &definition,
        documents.iter().map(|doc| doc.metadata()),
    );

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else if report.is_empty() {
        println!("No subcategories have documents.");
    } else {
        for category in &report {
            match &category.name {
                Some(name) => println!("{} ({name})", category.id),
                None => println!("{}", category.id),
            }
            for sub in &category.subcategories {
                let name = sub.name.as_deref().unwrap_or(&sub.id);
                let weight = sub
                    .weight
                    .map(|w| format!(", weight {w}"))
                    .unwrap_or_default();
                println!(
                    "  {}\t{name}\t{} document(s){weight}",
                    sub.id, sub.document_count
                );
            }
        }
    }
    Ok(())
}

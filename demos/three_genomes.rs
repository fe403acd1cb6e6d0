//! Synchronize three genomes on one chromosome and print where their bases
//! land on the meta-genome axis.
//!
//! Run with `RUST_LOG=debug cargo run --example three_genomes` to see the
//! per-source and per-track log lines.

use anyhow::{Context, Result};
use metagenome::{
    synchronize_sources, Alternative, CoordinateTranslator, GenomePosition, ProjectLayout,
    SyncConfig, VariantRecord, VariantSource,
};
use tracing::info;

fn init_logging() {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(fmt::layer().with_target(false))
        .init();
}

fn main() -> Result<()> {
    init_logging();

    let layout = ProjectLayout::builder("GRCh38")
        .genome("alpha", 2)
        .genome("beta", 1)
        .genome("gamma", 1)
        .chromosome("chr1", 120)
        .build()
        .context("invalid project layout")?;

    let records = vec![
        VariantRecord::new("chr1", 20)
            .with_alternative(Alternative::insertion(2))
            .with_alternative(Alternative::insertion(4))
            .with_genotype("alpha", "1|2")
            .with_genotype("beta", "0"),
        VariantRecord::new("chr1", 60)
            .with_alternative(Alternative::deletion(3))
            .with_genotype("alpha", "0|1")
            .with_genotype("beta", "1"),
    ];
    let gamma = vec![VariantRecord::new("chr1", 90)
        .with_alternative(Alternative::insertion(6))
        .with_genotype("gamma", "1")];

    let sources = vec![
        VariantSource::new("alpha_beta.vcf", ["alpha", "beta"], records),
        VariantSource::new("gamma.vcf", ["gamma"], gamma),
    ];
    let outcome = synchronize_sources(&layout, sources, &SyncConfig::default())
        .context("synchronization failed")?;
    for failure in &outcome.failures {
        info!(track = %failure.track, error = %failure.error, "track skipped");
    }

    let translator = CoordinateTranslator::new(&outcome.index);
    let meta_length = translator
        .meta_chromosome_length("chr1")
        .context("chr1 has no meta-genome length")?;
    println!("chr1: reference 120 bases, meta-genome {meta_length} columns");

    let tracks = [("GRCh38", 0), ("alpha", 0), ("alpha", 1), ("beta", 0), ("gamma", 0)];
    for (genome, allele) in tracks {
        let columns = [20u64, 21, 61, 64, 100]
            .iter()
            .map(|&position| {
                translator
                    .to_meta_genome(genome, allele, "chr1", position)
                    .map(|meta| format!("{position}->{meta}"))
            })
            .collect::<Result<Vec<_>, _>>()?;
        println!("{genome}#{allele}: {}", columns.join(" "));
    }

    match translator.genome_to_genome(("alpha", 1), ("beta", 0), "chr1", 23)? {
        GenomePosition::Present(position) => println!("alpha#1:23 is beta#0:{position}"),
        GenomePosition::NotPresent => println!("alpha#1:23 has no counterpart in beta#0"),
    }

    Ok(())
}

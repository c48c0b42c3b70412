use schema_crud::infra::logging;
use schema_crud::{ConnectionParams, DataEngine};

fn usage_and_exit() -> ! {
    eprintln!(
        "Usage: cargo run --bin preflight -- [--describe]\n\
         \n\
         Requires env vars:\n\
           DATABASE_URL, or DB_USER and DB_NAME (DB_HOST, DB_PORT, DB_PASSWORD optional)\n"
    );
    std::process::exit(2);
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logging::init_tracing();

    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.iter().any(|a| a == "-h" || a == "--help") {
        usage_and_exit();
    }
    let describe = args.iter().any(|a| a == "--describe");

    // Force-read config (nice error messages if missing)
    let params = ConnectionParams::from_env()?;

    println!("> Preflight:");
    println!("  target={}", params.describe());

    let engine = DataEngine::connect(&params).await?;
    engine.ping().await?;
    println!("  Connected. Schema: {}", engine.schema_name());

    let tables = engine.list_tables().await?;
    println!("  Tables ({}):", tables.len());
    for table in &tables {
        if !describe {
            println!("    {}", table);
            continue;
        }
        let schema = engine.describe_table(table).await?;
        let pk = schema
            .primary_key
            .as_ref()
            .map(|pk| pk.columns.join(", "))
            .unwrap_or_else(|| "none".to_string());
        println!(
            "    {} ({} columns, primary key: {}, foreign keys: {})",
            table,
            schema.columns.len(),
            pk,
            schema.foreign_keys.len()
        );
        for fk in &schema.foreign_keys {
            println!(
                "      {} -> {}.{}",
                fk.source_column, fk.referenced_table, fk.referenced_column
            );
        }
    }

    let procedures = engine.list_procedures().await?;
    println!("  Procedures ({}): {}", procedures.len(), procedures.join(", "));

    engine.close().await?;
    println!("> Preflight OK.");
    Ok(())
}

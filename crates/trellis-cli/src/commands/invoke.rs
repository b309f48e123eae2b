//! `trellis invoke`: call the demo service through the interceptor chain.

use serde::Serialize;
use tracing::info;
use trellis_core::prelude::*;

use crate::{
    cli::InvokeArgs,
    config::AppConfig,
    demo,
    error::CliResult,
    output::OutputManager,
};

#[derive(Debug, Serialize)]
struct TransactionView {
    name: String,
    read_only: bool,
    outcome: String,
}

#[derive(Debug, Serialize)]
struct InvokeView {
    method: String,
    arguments: Vec<Value>,
    interceptors: Vec<String>,
    results: Vec<Value>,
    transactions: Vec<TransactionView>,
}

pub fn execute(args: InvokeArgs, config: AppConfig, output: OutputManager) -> CliResult<()> {
    let demo = demo::build(&config.invoke)?;
    let arguments: Vec<Value> = args.args.iter().map(|raw| demo::parse_argument(raw)).collect();
    let interceptors = demo
        .proxy
        .chain()
        .interceptors_for(&args.method)
        .iter()
        .map(|interceptor| interceptor.name().to_string())
        .collect::<Vec<_>>();
    info!(method = %args.method, interceptors = ?interceptors, "Invoking demo service");

    let mut results = Vec::with_capacity(args.times as usize);
    for _ in 0..args.times {
        results.push(demo.proxy.call(&args.method, arguments.clone())?);
    }

    let transactions: Vec<TransactionView> = demo
        .transactions
        .history()
        .into_iter()
        .map(|record| TransactionView {
            name: record.name,
            read_only: record.read_only,
            outcome: record
                .outcome
                .map_or_else(|| "Active".to_string(), |outcome| format!("{outcome:?}")),
        })
        .collect();

    if output.is_json() {
        return output.json(&InvokeView {
            method: args.method,
            arguments,
            interceptors,
            results,
            transactions,
        });
    }

    output.header(&format!(
        "{}.{} via [{}]",
        demo::TYPE_NAME,
        args.method,
        interceptors.join(", ")
    ))?;
    for result in &results {
        output.value(&serde_json::to_string(result)?)?;
    }
    for transaction in &transactions {
        let mode = if transaction.read_only { " (read-only)" } else { "" };
        output.print(&output.muted(&format!(
            "transaction {}{}: {}",
            transaction.name, mode, transaction.outcome
        )))?;
    }
    Ok(())
}

//! Walkthrough of bulk selection and elastic refill against an in-memory
//! collection, driving the model the way the bubbletea-rs runtime would:
//! each command is awaited and its message fed back into `update()`.

use bubbletea_lazytable::prelude::*;
use bubbletea_rs::Cmd;
use std::sync::Arc;

async fn drain(table: &mut LazyTable<DefaultRecord>, mut cmd: Option<Cmd>) {
    while let Some(pending) = cmd {
        let Some(msg) = pending.await else { break };
        cmd = table.update(msg);
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    let records: Vec<DefaultRecord> = (1..=100)
        .map(|i| DefaultRecord::new(i, format!("artwork {i}")))
        .collect();
    let mut table: LazyTable<DefaultRecord> =
        LazyTable::new(Arc::new(VecFetcher::new(records)), 1, 12);

    println!("-- initial load, page 1 of a 100-record collection --");
    let cmd = table.reload();
    drain(&mut table, Some(cmd)).await;
    println!("{}\n", table.view());

    println!("-- select the first 25 records (spans pages 1-3) --");
    let cmd = table.select_first(25);
    drain(&mut table, cmd).await;
    println!("{}\n", table.view());

    println!("-- deselect record 1; the gap refills from later pages --");
    let cmd = table.deselect(1);
    drain(&mut table, cmd).await;
    println!("{}\n", table.view());

    let ids: Vec<RecordId> = table.selection().iter().map(Record::id).collect();
    println!("selected ids: {ids:?}");
}

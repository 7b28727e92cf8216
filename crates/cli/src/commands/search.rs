//! Interactive search over stdin with debounced queries.

use anyhow::Result;
use student_records_client::{Debouncer, SearchState, StudentClient};
use tokio::io::{AsyncBufReadExt, BufReader};

pub(crate) async fn run(url: &str, limit: usize) -> Result<()> {
    let client = StudentClient::new(url)?;
    let mut state = SearchState::new();
    let (debouncer, mut settled) = Debouncer::<String>::for_search();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        tokio::select! {
            line = lines.next_line() => match line? {
                Some(line) => {
                    state.set_search_term(line.clone());
                    if !debouncer.push(line) {
                        break;
                    }
                },
                None => break,
            },
            Some(term) = settled.recv() => query(&client, &mut state, term, limit).await?,
        }
    }

    debouncer.finish().await;
    while let Some(term) = settled.recv().await {
        query(&client, &mut state, term, limit).await?;
    }
    Ok(())
}

async fn query(
    client: &StudentClient,
    state: &mut SearchState,
    term: String,
    limit: usize,
) -> Result<()> {
    state.settle(term);
    let request = state.request(limit, 0);
    let students = match client.list_students(&request).await {
        Ok(students) => students,
        Err(e) => {
            tracing::warn!(term = state.settled_term(), error = %e, "search failed");
            return Ok(());
        },
    };
    let view = state.view(&students);
    let stats = state.stats(&students);
    tracing::info!(
        term = %stats.search_term,
        total = stats.total,
        filtered = stats.filtered,
        "search settled"
    );
    println!("{}", serde_json::to_string_pretty(&view)?);
    Ok(())
}

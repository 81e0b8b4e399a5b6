mod common;

use std::path::Path;

use anyhow::Result;
use budget_tracker::cli::Cli;
use clap::Parser;
use common::TestDb;

fn cli(db: &TestDb, args: &[&str]) -> Cli {
    let mut argv = vec!["budget-tracker", "--database", db.path.as_str()];
    argv.extend_from_slice(args);
    Cli::parse_from(argv)
}

#[tokio::test]
async fn test_commands_other_than_init_do_not_create_database() -> Result<()> {
    let db = TestDb::new()?;

    let commands: [&[&str]; 3] = [&["list"], &["summary"], &["delete", "abc"]];
    for args in commands {
        let result = cli(&db, args).run().await;
        let err = result.expect_err("database was never initialized");
        assert!(format!("{:#}", err).contains("budget-tracker init"));
    }
    assert!(!Path::new(&db.path).exists());

    Ok(())
}

#[tokio::test]
async fn test_init_then_add_and_delete() -> Result<()> {
    let db = TestDb::new()?;

    cli(&db, &["init"]).run().await?;
    assert!(Path::new(&db.path).exists());

    cli(&db, &["add", "expense", "Books", "18", "--date", "2024-05-05"])
        .run()
        .await?;
    let service = db.open().await?;
    assert_eq!(service.len(), 1);
    let id = service.transactions()[0].id.to_string();

    cli(&db, &["delete", id.as_str()]).run().await?;
    assert!(db.open().await?.is_empty());

    Ok(())
}

use parambind::{Dialect, PlaceholderIdentity, PlaceholderRenderer};

pub fn run() -> anyhow::Result<()> {
    for line in dialect_table() {
        println!("{line}");
    }
    Ok(())
}

fn dialect_table() -> Vec<String> {
    Dialect::ALL
        .iter()
        .map(|d| {
            let reuse = match d.identity() {
                PlaceholderIdentity::BySlot => "reused",
                PlaceholderIdentity::ByOccurrence => "per occurrence",
            };
            format!("{:<12} {:<8} {reuse}", d.to_string(), d.placeholder(1))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lists_every_dialect() {
        let table = dialect_table();
        assert_eq!(table.len(), Dialect::ALL.len());
        assert_eq!(table[0], "postgres     $1       reused");
        assert!(table.iter().any(|l| l.starts_with("mssql        @1 ")));
        assert!(table.iter().any(|l| l.ends_with("per occurrence")));
    }
}

use crate::cli::{RenderArgs, Source};
use crate::config::ConfigFile;
use parambind::{EmptyListPolicy, Params, Rendered, Renderer};
use serde_json::Value;
use std::io::Read;

pub fn run(args: RenderArgs) -> anyhow::Result<()> {
    let file = ConfigFile::load_or_default(&args.config, args.config_explicit)?;

    let dialect = args.dialect.or(file.dialect).unwrap_or_default();
    let mut config = file.render;
    if args.reject_empty_lists {
        config = config.with_empty_list_policy(EmptyListPolicy::Reject);
    }
    if let Some(max) = args.max_params {
        config = config.with_max_params(max);
    }

    let template = read_template(args.template.as_ref())?;
    let params = read_params(args.params.as_ref())?;

    let renderer = Renderer::new(dialect).with_config(config);
    let out = renderer
        .render(&template, &params)
        .map_err(|e| anyhow::anyhow!("failed to render template for {dialect}: {e}"))?;

    println!("{}", format_output(&out, args.json)?);
    Ok(())
}

fn read_template(source: Option<&Source>) -> anyhow::Result<String> {
    match source {
        Some(Source::Inline(sql)) => Ok(sql.clone()),
        Some(Source::File(path)) => std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("failed to read {}: {e}", path.display())),
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .map_err(|e| anyhow::anyhow!("failed to read stdin: {e}"))?;
            if buf.trim().is_empty() {
                anyhow::bail!("no template provided (pass TEMPLATE, --file, or pipe SQL to stdin)");
            }
            Ok(buf)
        }
    }
}

fn read_params(source: Option<&Source>) -> anyhow::Result<Params<Value>> {
    let (raw, origin) = match source {
        None => return Ok(Params::new()),
        Some(Source::Inline(json)) => (json.clone(), "--params".to_string()),
        Some(Source::File(path)) => {
            let raw = std::fs::read_to_string(path)
                .map_err(|e| anyhow::anyhow!("failed to read {}: {e}", path.display()))?;
            (raw, path.display().to_string())
        }
    };
    Params::from_json_str(&raw)
        .map_err(|e| anyhow::anyhow!("{origin} must be a JSON object: {e}"))
}

/// SQL on the first line, then one `index: value` line per bound value.
fn format_output(out: &Rendered<'_, Value>, json: bool) -> anyhow::Result<String> {
    if json {
        let doc = serde_json::json!({
            "sql": out.sql(),
            "values": out.values(),
        });
        return Ok(serde_json::to_string_pretty(&doc)?);
    }

    let mut text = out.sql().trim_end().to_string();
    for (i, value) in out.values().iter().enumerate() {
        text.push_str(&format!("\n{}: {value}", i + 1));
    }
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use parambind::{Dialect, render};

    fn params(json: &str) -> Params<Value> {
        read_params(Some(&Source::Inline(json.to_string()))).unwrap()
    }

    #[test]
    fn text_output_lists_values_by_position() {
        let p = params(r#"{"n": 2.4, "tag": "x"}"#);
        let out = render("SELECT :n, :tag, :n\n", &p, Dialect::Oracle).unwrap();
        assert_eq!(
            format_output(&out, false).unwrap(),
            "SELECT :1, :2, :1\n1: 2.4\n2: \"x\""
        );
    }

    #[test]
    fn json_output() {
        let p = params(r#"{"ids": [1, 2]}"#);
        let out = render("id IN (:ids)", &p, Dialect::MySql).unwrap();
        let doc: Value = serde_json::from_str(&format_output(&out, true).unwrap()).unwrap();
        assert_eq!(doc, serde_json::json!({"sql": "id IN (?, ?)", "values": [1, 2]}));
    }

    #[test]
    fn params_must_be_an_object() {
        let err = read_params(Some(&Source::Inline("[1]".to_string()))).unwrap_err();
        assert!(err.to_string().starts_with("--params must be a JSON object"));
        assert!(read_params(None).unwrap().is_empty());
    }

    #[test]
    fn inline_template_is_used_verbatim() {
        let sql = read_template(Some(&Source::Inline("SELECT 1".to_string()))).unwrap();
        assert_eq!(sql, "SELECT 1");
    }
}

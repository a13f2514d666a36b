//! Notice command.

use anyhow::{Context as _, Result};
use edge_core::{Integration, RequestContext, Screen, Viewer};

use super::NoticeArgs;
use crate::context::Context;
use crate::output::severity_badge;

/// Run the notice command.
pub fn run(args: NoticeArgs, ctx: &Context) -> Result<()> {
    let request = request_context(&args)?;
    ctx.output.debug(&format!("Request {}", request.request_id));

    let advisor = ctx.advisor()?;
    let notices = if args.all {
        advisor.collect_notices(&request)
    } else {
        advisor.select_notice(&request).into_iter().collect()
    };

    if ctx.output.is_json() {
        ctx.output.json(&notices);
        return Ok(());
    }

    if notices.is_empty() {
        ctx.output.info("No notice");
        return Ok(());
    }

    for notice in &notices {
        ctx.output.header(notice.kind.as_str());
        ctx.output.kv("severity", &severity_badge(notice.severity));
        ctx.output.kv("dismissible", &notice.dismissible.to_string());
        if let Some(rank) = notice.rank {
            ctx.output.kv("rank", &rank.to_string());
        }
        ctx.output.list_item(&notice.message);
    }

    Ok(())
}

fn request_context(args: &NoticeArgs) -> Result<RequestContext> {
    let screen = if args.settings {
        Screen::Settings
    } else {
        match &args.screen {
            Some(id) => Screen::from_id(id),
            None => Screen::Unknown,
        }
    };

    let integration = parse_integration(&args.integration)?;

    let mut request = RequestContext::new(screen, integration).with_composer(args.composer);
    if let Some(id) = args.user {
        let viewer = if args.read_only {
            Viewer::read_only(id)
        } else {
            Viewer::manager(id)
        };
        request = request.with_viewer(viewer);
    }

    Ok(request)
}

fn parse_integration(raw: &str) -> Result<Integration> {
    if raw.eq_ignore_ascii_case("none") || raw.is_empty() {
        return Ok(Integration::Missing);
    }
    Integration::installed(raw).with_context(|| format!("Invalid integration version: {}", raw))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_integration() {
        assert_eq!(parse_integration("none").unwrap(), Integration::Missing);
        assert_eq!(
            parse_integration("1.4").unwrap().version().map(|v| v.to_string()),
            Some("1.4.0".to_string())
        );
        assert!(parse_integration("soon").is_err());
    }
}

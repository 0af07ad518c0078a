use report_view_core::{
    ContainerId, ContainerSnapshot, Interaction, LabelId, ViewToggleController, load_layout,
};
use std::io::Write;
use std::path::Path;

use crate::context::{CliContext, Controller};

/// Render a layout file and bind the controller to it
pub async fn load(path: &str, ctx: &CliContext) -> Result<(), String> {
    let layout = load_layout(Path::new(path)).map_err(|e| error_chain(&e))?;
    let config = ctx.config.read().await.clone();
    let dom = layout.render(&config);
    let controller = ViewToggleController::bind(dom, config).map_err(|e| e.to_string())?;

    println!("loaded {} dataset container(s) from {path}", controller.len());
    ctx.set_controller(controller).await;
    Ok(())
}

pub async fn list_containers(ctx: &CliContext) -> Result<(), String> {
    ctx.with_controller(|c| {
        for id in c.container_ids() {
            let container = c.container(id).map_err(|e| e.to_string())?;
            println!(
                "[{}] panes: {}  labels: {}  graphs: {}  views: {}",
                id.0,
                container.panes.len(),
                container.labels.len(),
                container.graph_variants().join(","),
                container.views().join(","),
            );
        }
        Ok(())
    })
    .await
}

pub async fn show(container: Option<usize>, json: bool, ctx: &CliContext) -> Result<(), String> {
    ctx.with_controller(|c| {
        let ids: Vec<ContainerId> = match container {
            Some(i) => vec![ContainerId(i)],
            None => c.container_ids().collect(),
        };
        for id in ids {
            let snap = c.snapshot(id).map_err(|e| e.to_string())?;
            if json {
                let text = serde_json::to_string_pretty(&snap).map_err(|e| e.to_string())?;
                println!("{text}");
            } else {
                print_snapshot(&snap);
            }
        }
        Ok(())
    })
    .await
}

pub async fn info(container: usize, ctx: &CliContext) -> Result<(), String> {
    dispatch(
        Interaction::ShowInfo {
            container: ContainerId(container),
        },
        ctx,
    )
    .await
}

pub async fn table(container: usize, ctx: &CliContext) -> Result<(), String> {
    dispatch(
        Interaction::HideInfo {
            container: ContainerId(container),
        },
        ctx,
    )
    .await
}

/// Click a label, addressed either by index or by the pane it refers to
pub async fn toggle(
    container: usize,
    label: Option<usize>,
    pane: Option<&str>,
    ctx: &CliContext,
) -> Result<(), String> {
    let id = ContainerId(container);
    ctx.with_controller(|c| {
        let label = resolve_label(c, id, label, pane)?;
        c.dispatch(Interaction::LabelClick { container: id, label })
            .map_err(|e| e.to_string())
    })
    .await?;
    show(Some(container), false, ctx).await
}

/// Pick a version in the dropdown, then fire its change event
pub async fn version(container: usize, variant: &str, ctx: &CliContext) -> Result<(), String> {
    let id = ContainerId(container);
    ctx.with_controller(|c| {
        let select = c
            .container(id)
            .map_err(|e| e.to_string())?
            .version_select
            .ok_or_else(|| format!("error: container {container} has no version selector"))?;
        if !c.dom_mut().select_option(select, variant) {
            return Err(format!("error: no version option '{variant}'"));
        }
        c.dispatch(Interaction::VersionChange { container: id })
            .map_err(|e| e.to_string())
    })
    .await?;
    show(Some(container), false, ctx).await
}

/// Pick a comparison view in the dropdown, then fire its change event
pub async fn view(container: usize, value: &str, ctx: &CliContext) -> Result<(), String> {
    let id = ContainerId(container);
    ctx.with_controller(|c| {
        let select = c
            .container(id)
            .map_err(|e| e.to_string())?
            .view_select
            .ok_or_else(|| format!("error: container {container} has no view selector"))?;
        if !c.dom_mut().select_option(select, value) {
            return Err(format!("error: no view option '{value}'"));
        }
        c.dispatch(Interaction::ViewChange { container: id })
            .map_err(|e| e.to_string())
    })
    .await?;
    show(Some(container), false, ctx).await
}

pub async fn list_bindings(ctx: &CliContext) -> Result<(), String> {
    ctx.with_controller(|c| {
        for b in c.bindings() {
            let interaction = serde_json::to_string(&b.interaction).map_err(|e| e.to_string())?;
            println!("node {:>4}  {:<6}  {interaction}", b.node.0, b.event.as_str());
        }
        Ok(())
    })
    .await
}

pub async fn dump(ctx: &CliContext) -> Result<(), String> {
    ctx.with_controller(|c| {
        print!("{}", c.dom().to_html());
        Ok(())
    })
    .await
}

pub async fn show_config(ctx: &CliContext) -> Result<(), String> {
    let config = ctx.config.read().await;
    println!("{config:#?}");
    Ok(())
}

pub fn exit() {
    let mut stdout = std::io::stdout();
    let _ = writeln!(stdout, "quitting...");
    let _ = stdout.flush();
}

async fn dispatch(interaction: Interaction, ctx: &CliContext) -> Result<(), String> {
    let container = match interaction {
        Interaction::ShowInfo { container }
        | Interaction::HideInfo { container }
        | Interaction::LabelClick { container, .. }
        | Interaction::VersionChange { container }
        | Interaction::ViewChange { container } => container,
    };
    ctx.with_controller(|c| c.dispatch(interaction).map_err(|e| e.to_string()))
        .await?;
    show(Some(container.0), false, ctx).await
}

fn resolve_label(
    c: &Controller,
    id: ContainerId,
    label: Option<usize>,
    pane: Option<&str>,
) -> Result<LabelId, String> {
    match (label, pane) {
        (Some(l), _) => Ok(LabelId(l)),
        (None, Some(p)) => c
            .container(id)
            .map_err(|e| e.to_string())?
            .label_for_pane(p)
            .map(LabelId)
            .ok_or_else(|| format!("error: no label refers to pane '{p}'")),
        (None, None) => Err("error: pass --label or --pane".to_string()),
    }
}

fn print_snapshot(snap: &ContainerSnapshot) {
    let trigger = if snap.hide_trigger_visible {
        "[hide info]"
    } else {
        "[show info]"
    };
    println!("[{}] {:?} {trigger}", snap.index, snap.mode);
    println!("  visible panes:   {}", snap.visible_panes.join(", "));
    println!("  hidden panes:    {}", snap.hidden_panes.join(", "));
    println!("  selected labels: {}", snap.selected_labels.join(", "));
    if let Some(variant) = &snap.graph_variant {
        println!(
            "  graph:           {variant} -> {}",
            snap.graph_src.as_deref().unwrap_or("(no source)")
        );
    }
    println!("  view:            {:?} ({:?} labels)", snap.view, snap.label_grouping);
}

fn error_chain(err: &dyn std::error::Error) -> String {
    let mut out = format!("error: {err}");
    let mut source = err.source();
    while let Some(e) = source {
        out.push_str(&format!(": {e}"));
        source = e.source();
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use report_view_core::{ContractConfig, Dom, ReportLayout, parse_layout};

    const LAYOUT: &str = r#"
        [[dataset]]
        panes = ["info_0", "info_1"]
        views = ["averages", "rundata"]

        [[dataset.graph]]
        variant = "v3"
        src = "graphs/v3.png"

        [[dataset.graph]]
        variant = "v4.1"
        src = "graphs/v41.png"
    "#;

    async fn loaded() -> CliContext {
        let ctx = CliContext::new(ContractConfig::default());
        let layout: ReportLayout = parse_layout(LAYOUT).unwrap();
        let dom = layout.render(&ContractConfig::default());
        ctx.set_controller(ViewToggleController::bind(dom, ContractConfig::default()).unwrap())
            .await;
        ctx
    }

    #[tokio::test]
    async fn test_commands_require_loaded_report() {
        let ctx = CliContext::new(ContractConfig::default());
        assert!(!ctx.is_loaded().await);
        assert!(info(0, &ctx).await.is_err());
    }

    #[tokio::test]
    async fn test_toggle_by_pane() {
        let ctx = loaded().await;
        toggle(0, None, Some("info_1"), &ctx).await.unwrap();

        let snap = ctx.with_controller(|c| c.snapshot(ContainerId(0)).map_err(|e| e.to_string()))
            .await
            .unwrap();
        assert_eq!(snap.visible_panes, vec!["info_1".to_string()]);
        assert!(snap.hide_trigger_visible);

        assert!(toggle(0, None, Some("info_9"), &ctx).await.is_err());
        assert!(toggle(0, None, None, &ctx).await.is_err());
    }

    #[tokio::test]
    async fn test_version_selects_option_then_dispatches() {
        let ctx = loaded().await;
        version(0, "v4.1", &ctx).await.unwrap();

        let (src, selected) = ctx
            .with_controller(|c| {
                let container = c.container(ContainerId(0)).map_err(|e| e.to_string())?;
                let select = container.version_select.unwrap();
                let img = container.graph_image.unwrap();
                Ok((c.dom().attr(img, "src"), c.dom().value(select)))
            })
            .await
            .unwrap();
        assert_eq!(src.as_deref(), Some("graphs/v41.png"));
        assert_eq!(selected.as_deref(), Some("v4.1"));

        assert!(version(0, "v9", &ctx).await.is_err());
    }

    #[tokio::test]
    async fn test_view_and_modes() {
        let ctx = loaded().await;
        view(0, "rundata", &ctx).await.unwrap();
        info(0, &ctx).await.unwrap();
        table(0, &ctx).await.unwrap();
        assert!(info(3, &ctx).await.is_err());
    }

    #[tokio::test]
    async fn test_demo_layout_binds() {
        let layout = parse_layout(include_str!("../../demos/nfs_report.toml")).unwrap();
        let dom = layout.render(&ContractConfig::default());
        let ctx = CliContext::new(ContractConfig::default());
        ctx.set_controller(ViewToggleController::bind(dom, ContractConfig::default()).unwrap())
            .await;

        let snaps = ctx
            .with_controller(|c| {
                c.container_ids()
                    .map(|id| c.snapshot(id).map_err(|e| e.to_string()))
                    .collect::<Result<Vec<_>, _>>()
            })
            .await
            .unwrap();
        assert_eq!(snaps.len(), 2);
        assert!(snaps[0].show_trigger_visible);
        assert_eq!(snaps[1].visible_panes, vec!["info_write_1".to_string()]);
        assert_eq!(snaps[1].graph_src.as_deref(), Some("graphs/write_v41.png"));
    }

    #[test]
    fn test_error_chain_includes_source() {
        let err = report_view_core::load_layout(Path::new("/nonexistent/layout.toml")).unwrap_err();
        let text = error_chain(&err);
        assert!(text.starts_with("error: failed to read /nonexistent/layout.toml: "));
    }
}

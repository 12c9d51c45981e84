mod common;

use common::{load_plugin, CallLog};
use regex::Regex;
use swc_core::ecma::ast::{Decl, Expr, Lit, ModuleDecl, ModuleItem, Stmt};
use tempfile::TempDir;
use transpipe::config::MissingLoaderPolicy;
use transpipe::plugin::builtin::{FsLoadPlugin, ReplacePlugin, ScopedPlugin};
use transpipe::plugin::LoadOutput;
use transpipe::{DiagnosticKind, PipelineBuilder};

fn project() -> TempDir {
    let dir = TempDir::new().unwrap();
    std::fs::create_dir_all(dir.path().join("src")).unwrap();
    std::fs::write(
        dir.path().join("src/index.js"),
        "export const greeting = `so ${ADJECTIVE}`;\nexport const flag = DEBUG;\n",
    )
    .unwrap();
    dir
}

fn exported_init(item: &ModuleItem) -> &Expr {
    match item {
        ModuleItem::ModuleDecl(ModuleDecl::ExportDecl(export)) => match &export.decl {
            Decl::Var(var) => var.decls[0].init.as_deref().unwrap(),
            other => panic!("unexpected declaration {:?}", other),
        },
        ModuleItem::Stmt(Stmt::Decl(Decl::Var(var))) => var.decls[0].init.as_deref().unwrap(),
        other => panic!("unexpected item {:?}", other),
    }
}

#[tokio::test]
async fn test_fs_load_and_replace_end_to_end() {
    let dir = project();
    let pipeline = PipelineBuilder::new(dir.path())
        .plugin(FsLoadPlugin::plugin())
        .plugin(
            ReplacePlugin::new()
                .replace("ADJECTIVE", "\"cool\"")
                .replace("DEBUG", "false")
                .plugin(),
        )
        .build();

    let processed = pipeline.process("src/index.js").await.unwrap();

    match exported_init(&processed.ast.body[0]) {
        Expr::Tpl(tpl) => assert!(matches!(&*tpl.exprs[0], Expr::Lit(Lit::Str(_)))),
        other => panic!("expected template literal, got {:?}", other),
    }
    assert!(matches!(
        exported_init(&processed.ast.body[1]),
        Expr::Lit(Lit::Bool(b)) if !b.value
    ));
    assert!(processed.warnings.is_empty());
}

#[tokio::test]
async fn test_scoped_loader_only_sees_matching_files() {
    let dir = project();
    let log = CallLog::new();
    let svg_loader = load_plugin("svg", &log, |_| {
        Ok(Some(LoadOutput::new("export default \"<svg/>\";", Some("js"))))
    });

    let pipeline = PipelineBuilder::new(dir.path())
        .plugin(ScopedPlugin::new(Regex::new(r"\.svg$").unwrap(), svg_loader).plugin())
        .plugin(FsLoadPlugin::plugin())
        .build();

    pipeline.process("src/index.js").await.unwrap();
    assert!(log.calls().is_empty());

    let processed = pipeline.process("assets/logo.svg").await.unwrap();
    assert_eq!(log.calls(), vec!["svg"]);
    assert_eq!(processed.ast.body.len(), 1);
}

#[tokio::test]
async fn test_missing_file_is_missing_loader() {
    let dir = project();
    let pipeline = PipelineBuilder::new(dir.path())
        .plugin(FsLoadPlugin::plugin())
        .build();

    let diagnostic = pipeline.process("src/absent.js").await.unwrap_err();
    assert_eq!(diagnostic.kind, DiagnosticKind::MissingLoader);
}

#[tokio::test]
async fn test_builder_reads_project_config() {
    let dir = project();
    std::fs::write(
        dir.path().join(".transpipe.toml"),
        "[pipeline]\nmissing_loader = \"continue\"\n\n[diagnostics]\ncolor = \"never\"\n",
    )
    .unwrap();

    let pipeline = PipelineBuilder::from_config(dir.path())
        .plugin(FsLoadPlugin::plugin())
        .build();
    assert_eq!(
        pipeline.settings().pipeline.missing_loader,
        MissingLoaderPolicy::Continue
    );

    // empty code parses; only warnings remain
    let processed = pipeline.process("src/absent.js").await.unwrap();
    assert_eq!(processed.warnings.len(), 2);
}

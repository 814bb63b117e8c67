use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand, ValueEnum};

use teestudio::assets::text::TextRenderer;
use teestudio::design::NoSink;
use teestudio::order::{
    CheckoutForm, CheckoutSimulator, OrderStep, RandomOutcome, SUPPORT_EMAIL, Submission,
};
use teestudio::preview::{PreviewLayout, PreviewState, ViewSide, compose_svg, render_png};
use teestudio::{Color, DesignEditor, Project, ShapeKind, StudioConfig, TextStyle};

#[derive(Parser, Debug)]
#[command(name = "teestudio", version)]
struct Cli {
    /// JSON config file (pricing, checkout, upload limits, fonts dir).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render a shape design as a PNG.
    Shape(ShapeArgs),
    /// Render a text design as a PNG.
    Text(TextArgs),
    /// Render the garment preview of a project.
    Preview(PreviewArgs),
    /// Print the price breakdown of a project.
    Quote(ProjectArgs),
    /// Simulate placing the order of a project.
    Checkout(CheckoutArgs),
    /// Add an image file to a project as a new design.
    AddUpload(AddUploadArgs),
}

#[derive(Parser, Debug)]
struct ShapeArgs {
    /// circle, square, triangle, star, heart or hexagon.
    #[arg(long)]
    kind: ShapeKind,

    #[arg(long, default_value = "#FF6B6B")]
    color: Color,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    /// Also append the design to this project file.
    #[arg(long)]
    add_to: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct TextArgs {
    #[arg(long)]
    text: String,

    #[arg(long, default_value = "Arial")]
    font: String,

    /// Font size in pixels.
    #[arg(long, default_value_t = 24.0)]
    size: f64,

    #[arg(long, default_value = "#000000")]
    color: Color,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    /// Also append the design to this project file.
    #[arg(long)]
    add_to: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct PreviewArgs {
    /// Input project JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output path (PNG, or SVG with `--svg`).
    #[arg(long)]
    out: PathBuf,

    #[arg(long, value_enum, default_value_t = ViewChoice::Front)]
    view: ViewChoice,

    /// Render at the fullscreen size.
    #[arg(long)]
    fullscreen: bool,

    /// Write the composed SVG document instead of a PNG.
    #[arg(long)]
    svg: bool,
}

#[derive(Parser, Debug)]
struct ProjectArgs {
    /// Input project JSON.
    #[arg(long = "in")]
    in_path: PathBuf,
}

#[derive(Parser, Debug)]
struct CheckoutArgs {
    /// Input project JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Seed for the order outcome draw.
    #[arg(long)]
    seed: Option<u64>,

    /// Override the simulated processing delay.
    #[arg(long)]
    delay_ms: Option<u64>,
}

#[derive(Parser, Debug)]
struct AddUploadArgs {
    /// Project JSON to update in place.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Image file to add.
    #[arg(long)]
    file: PathBuf,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ViewChoice {
    Front,
    Back,
}

impl From<ViewChoice> for ViewSide {
    fn from(v: ViewChoice) -> Self {
        match v {
            ViewChoice::Front => ViewSide::Front,
            ViewChoice::Back => ViewSide::Back,
        }
    }
}

fn main() -> anyhow::Result<()> {
    init_logging();
    let cli = Cli::parse();
    let cfg = StudioConfig::resolve(cli.config.as_deref()).context("load config")?;
    match cli.cmd {
        Command::Shape(args) => cmd_shape(&cfg, args),
        Command::Text(args) => cmd_text(&cfg, args),
        Command::Preview(args) => cmd_preview(&cfg, args),
        Command::Quote(args) => cmd_quote(&cfg, args),
        Command::Checkout(args) => cmd_checkout(&cfg, args),
        Command::AddUpload(args) => cmd_add_upload(&cfg, args),
    }
}

fn init_logging() {
    use tracing_subscriber::EnvFilter;
    use tracing_subscriber::prelude::*;

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(env_filter)
        .init();
}

fn runtime() -> anyhow::Result<tokio::runtime::Runtime> {
    tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()
        .context("start tokio runtime")
}

fn read_project(path: &Path) -> anyhow::Result<Project> {
    Project::load(path).with_context(|| format!("load project '{}'", path.display()))
}

fn write_output(path: &Path, bytes: &[u8]) -> anyhow::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    std::fs::write(path, bytes).with_context(|| format!("write '{}'", path.display()))?;
    eprintln!("wrote {}", path.display());
    Ok(())
}

fn text_renderer(cfg: &StudioConfig) -> TextRenderer {
    TextRenderer::with_fonts_dir(cfg.fonts_dir.as_deref())
}

fn editor_for(cfg: &StudioConfig, project: &Project) -> DesignEditor {
    DesignEditor::new(project.designs.clone(), NoSink)
        .with_text_renderer(text_renderer(cfg))
        .with_upload_limit(cfg.upload.max_bytes)
}

fn save_designs(path: &Path, mut project: Project, editor: &DesignEditor) -> anyhow::Result<()> {
    project.designs = editor.designs().to_vec();
    project
        .save(path)
        .with_context(|| format!("save project '{}'", path.display()))?;
    eprintln!("{}: {} design(s)", path.display(), project.designs.len());
    Ok(())
}

fn cmd_shape(cfg: &StudioConfig, args: ShapeArgs) -> anyhow::Result<()> {
    let url = teestudio::assets::generate_shape(args.kind, args.color)?;
    write_output(&args.out, url.bytes())?;

    if let Some(project_path) = args.add_to {
        let project = read_project(&project_path)?;
        let mut editor = editor_for(cfg, &project);
        editor.add_image(url.into());
        save_designs(&project_path, project, &editor)?;
    }
    Ok(())
}

fn cmd_text(cfg: &StudioConfig, args: TextArgs) -> anyhow::Result<()> {
    let style = TextStyle {
        font: args.font,
        size_px: args.size,
        color: args.color,
    };
    let Some(url) = text_renderer(cfg).generate(&args.text, &style)? else {
        anyhow::bail!("text is blank; nothing to render");
    };
    write_output(&args.out, url.bytes())?;

    if let Some(project_path) = args.add_to {
        let project = read_project(&project_path)?;
        let mut editor = editor_for(cfg, &project);
        editor.add_image(url.into());
        save_designs(&project_path, project, &editor)?;
    }
    Ok(())
}

fn cmd_preview(cfg: &StudioConfig, args: PreviewArgs) -> anyhow::Result<()> {
    let project = read_project(&args.in_path)?;
    let mut state = PreviewState::new(false);
    state.view = args.view.into();
    state.fullscreen = args.fullscreen;

    for line in state.summary(&project.shirt, project.designs.len()) {
        eprintln!("{line}");
    }

    if args.svg {
        let layout = PreviewLayout::for_state(&state);
        let svg = compose_svg(&project.shirt, &project.designs, &state, layout);
        return write_output(&args.out, svg.as_bytes());
    }

    let resources = args.in_path.parent().unwrap_or_else(|| Path::new("."));
    let frame = render_png(
        &text_renderer(cfg),
        &project.shirt,
        &project.designs,
        &state,
        Some(resources),
    )?;
    let png = teestudio::encode_png(&frame)?;
    write_output(&args.out, &png)
}

fn cmd_quote(cfg: &StudioConfig, args: ProjectArgs) -> anyhow::Result<()> {
    let project = read_project(&args.in_path)?;
    let q = project.quote(&cfg.pricing);
    println!(
        "Camiseta {} ({}, Talla {}): {}",
        project.shirt.model.display_name(),
        project.shirt.color_name(),
        project.shirt.size,
        q.base
    );
    println!("Diseños ({}): {}", project.designs.len(), q.designs);
    println!("Subtotal: {}", q.subtotal);
    println!("Impuestos: {}", q.tax);
    println!("Envío: {}", q.shipping_label());
    println!("Total: {}", q.total);
    Ok(())
}

fn cmd_checkout(cfg: &StudioConfig, args: CheckoutArgs) -> anyhow::Result<()> {
    let project = read_project(&args.in_path)?;
    let mut checkout = cfg.checkout;
    if let Some(ms) = args.delay_ms {
        checkout.delay_ms = ms;
    }
    let source = match args.seed {
        Some(seed) => RandomOutcome::seeded(seed),
        None => RandomOutcome::from_entropy(),
    };
    let mut sim = CheckoutSimulator::new(checkout, cfg.pricing, source);
    let mut form = CheckoutForm::new(project.customer.clone());
    let mut step = OrderStep::default();

    let rt = runtime()?;
    let outcome = rt.block_on(async {
        match sim.submit(&mut form, &project.shirt, project.designs.len())? {
            Submission::Invalid(errors) => Ok::<_, anyhow::Error>(Err(errors)),
            Submission::Started(task) => {
                step.begin()?;
                eprintln!("Procesando pedido...");
                Ok(Ok(task.await?))
            }
        }
    })?;

    let outcome = match outcome {
        Ok(outcome) => outcome,
        Err(errors) => {
            for (field, err) in &errors {
                eprintln!("{field:?}: {err}");
            }
            anyhow::bail!("customer details are incomplete ({} field(s))", errors.len());
        }
    };
    step.finish(outcome)?;

    match &step {
        OrderStep::Success(c) => {
            println!("¡Pedido confirmado! Número de pedido: {}", c.order_number);
            println!("Fecha: {}", c.placed_on);
            println!("Entrega estimada: {}", c.estimated_delivery);
            println!("Total: {}", c.quote.total);
        }
        OrderStep::Failed => {
            println!("Error al procesar el pedido. Escríbenos a {SUPPORT_EMAIL}");
        }
        OrderStep::Form | OrderStep::Processing => {
            println!("Pedido cancelado");
        }
    }
    Ok(())
}

fn cmd_add_upload(cfg: &StudioConfig, args: AddUploadArgs) -> anyhow::Result<()> {
    let project = read_project(&args.in_path)?;
    let mut editor = editor_for(cfg, &project);

    let rt = runtime()?;
    let added = rt.block_on(editor.add_upload_from_path(&args.file))?;
    match added {
        Ok(id) => {
            eprintln!("added design {id}");
            save_designs(&args.in_path, project, &editor)
        }
        Err(rejection) => anyhow::bail!("{rejection}"),
    }
}

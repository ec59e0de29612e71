use miri_performance::{DataRepository, Mode, PlotKind, PlotOptions, SourceType, Style};
use strum::IntoEnumIterator;
use structopt::StructOpt;

#[derive(Debug, StructOpt)]
#[structopt(
    name = "miri-performance",
    about = "MIRI ETC sensitivity and saturation limits"
)]
struct Opt {
    /// ETC version, e.g. 1.4
    version: String,
    /// Plot: imager, lrs, mrs, sens, bright or all
    #[structopt(short, long)]
    plot: Option<String>,
    /// Restrict the imager, LRS and MRS plots to one source type: point or extended
    #[structopt(short, long)]
    source: Option<String>,
    /// Save the plots as PNG files
    #[structopt(long)]
    save: bool,
    /// Plot file name stem
    #[structopt(short, long)]
    name: Option<String>,
    /// Plot style: default, paper or talk
    #[structopt(long, default_value = "default")]
    style: String,
    /// Display the content of the point and extended source tables of a mode: imaging, lrs or mrs
    #[structopt(long)]
    summary: Option<String>,
    /// Path to the ETC data repository [env: MIRI_DATA_FILES]
    #[structopt(long)]
    data: Option<String>,
    /// Path to the plots repository [env: MIRI_PLOTS]
    #[structopt(long)]
    plots: Option<String>,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let opt = Opt::from_args();

    let data = match &opt.data {
        Some(path) => DataRepository::new(path),
        None => DataRepository::default(),
    };

    if let Some(mode) = &opt.summary {
        let mode: Mode = mode.parse()?;
        for source_type in SourceType::iter() {
            println!(
                "{} {} (ETC {}):",
                mode.to_pretty_string(),
                source_type.to_pretty_string(),
                opt.version.trim()
            );
            data.load(&opt.version, mode, source_type)?.summary();
        }
    }

    if let Some(plot) = &opt.plot {
        let style: Style = opt.style.parse()?;
        let mut options = PlotOptions::default()
            .style(style)
            .data_repository(data.clone());
        if opt.save {
            options = options.save();
        }
        if let Some(arg) = &opt.name {
            options = options.basename(arg);
        }
        if let Some(arg) = &opt.source {
            options = options.sources(vec![arg.parse()?]);
        }
        if let Some(arg) = &opt.plots {
            options = options.plots_root(arg);
        }
        let kinds: Vec<PlotKind> = match plot.as_str() {
            "all" => PlotKind::iter().collect(),
            kind => vec![kind.parse()?],
        };
        for kind in kinds {
            println!("{} plots:", kind);
            for figure in kind.make(&opt.version, &options)? {
                println!(" - {}", figure);
                if opt.save {
                    println!(
                        "   saved to {:?}",
                        options.output_path(&opt.version, &figure.name)
                    );
                }
            }
        }
    }

    Ok(())
}

//*** START FILE: src/main.rs ***//
use clap::{ArgAction, Args, Parser, Subcommand};
use eframe::{egui, App, NativeOptions};
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use crossbeam_channel::{Receiver, TryRecvError};

use kidtext::batch::{run_batch, BatchArgs};
use kidtext::collaborators::Collaborators;
use kidtext::config::{load_config_or_default, DEFAULT_CONFIG_FILE};
use kidtext::dictionary_io::save_dictionary_snapshot;
use kidtext::simplification::dictionary::EasyWordDictionary;
use kidtext::{Error, PipelineConfig, PipelineResult, Settings, Simplifier};

/// Rewrites text into simpler, friendlier language for kids.
#[derive(Parser)]
#[command(name = "kidtext", version)]
struct Cli {
    /// Settings file; defaults are used when it does not exist
    #[arg(long, global = true, default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    /// -v for info, -vv for debug logging
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Without a subcommand the desktop window opens
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Simplify one document (a file, or stdin with `-`)
    Simplify(SimplifyArgs),
    /// Simplify every document named in a list file
    Batch {
        #[arg(long)]
        list: PathBuf,
        #[arg(long)]
        out_dir: PathBuf,
    },
    /// Write the built-in easy-word dictionary as editable JSON
    DumpDictionary { file: PathBuf },
}

#[derive(Args)]
struct SimplifyArgs {
    /// Input file; stdin when missing or `-`
    input: Option<PathBuf>,
    #[arg(long, value_parser = clap::value_parser!(u8).range(1..=5))]
    strength: Option<u8>,
    #[arg(long)]
    seed: Option<u64>,
    #[arg(long)]
    no_humanize: bool,
    #[arg(long)]
    generative: bool,
    /// Keep only every other sentence of longer texts
    #[arg(long)]
    shorten: bool,
    #[arg(long)]
    output: Option<PathBuf>,
    /// Write synthesized speech here (needs [speech] command)
    #[arg(long)]
    audio: Option<PathBuf>,
    /// Print text and readability as JSON
    #[arg(long)]
    json: bool,
}

impl SimplifyArgs {
    fn apply(&self, config: &mut PipelineConfig) {
        if let Some(strength) = self.strength {
            config.strength = strength;
        }
        if self.seed.is_some() {
            config.random_seed = self.seed;
        }
        if self.no_humanize {
            config.humanize = false;
        }
        if self.generative {
            config.use_generative_model = true;
        }
        if self.shorten {
            config.aggressive_shortening = true;
        }
    }
}

fn init_logging(verbose: u8) {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    match verbose {
        0 => {}
        1 => {
            builder.filter_level(log::LevelFilter::Info);
        }
        _ => {
            builder.filter_level(log::LevelFilter::Debug);
        }
    }
    builder.init();
}

fn read_input(input: Option<&Path>) -> kidtext::Result<String> {
    match input {
        Some(path) if path != Path::new("-") => Ok(fs::read_to_string(path)?),
        _ => {
            let mut raw = String::new();
            io::stdin().read_to_string(&mut raw)?;
            Ok(raw)
        }
    }
}

fn run_simplify(settings: &Settings, args: &SimplifyArgs) -> kidtext::Result<()> {
    let mut config = settings.pipeline.clone();
    args.apply(&mut config);
    let simplifier = Simplifier::from_settings(settings)?;

    let raw = read_input(args.input.as_deref())?;
    let result = simplifier.simplify(&raw, &config)?;

    let rendered = if args.json {
        serde_json::to_string_pretty(&result)?
    } else {
        result.text.clone()
    };
    match &args.output {
        Some(path) => fs::write(path, format!("{}\n", rendered))?,
        None => println!("{}", rendered),
    }
    if !args.json {
        if let Some(report) = &result.readability {
            eprintln!(
                "Grade level {:.1}, reading ease {:.1}",
                report.grade_level, report.ease_score
            );
        }
    }

    if let Some(audio_path) = &args.audio {
        match simplifier.synthesize_speech(&result.text) {
            Some(audio) => fs::write(audio_path, audio)?,
            None => eprintln!("No audio written: speech synthesis is not available."),
        }
    }
    Ok(())
}

fn run_cli(settings: &Settings, command: &Commands) -> kidtext::Result<()> {
    match command {
        Commands::Simplify(args) => run_simplify(settings, args),
        Commands::Batch { list, out_dir } => {
            let simplifier = Simplifier::from_settings(settings)?;
            let args = BatchArgs {
                list_path: list.clone(),
                out_dir: out_dir.clone(),
            };
            let report = run_batch(&simplifier, &settings.pipeline, &args)?;
            println!(
                "Simplified {} documents, skipped {}.",
                report.processed.len(),
                report.skipped.len()
            );
            for (path, reason) in &report.skipped {
                eprintln!("  skipped {}: {}", path.display(), reason);
            }
            Ok(())
        }
        Commands::DumpDictionary { file } => {
            let dictionary = EasyWordDictionary::builtin()
                .with_activation_threshold(settings.dictionary.activation_threshold);
            save_dictionary_snapshot(&dictionary, file)?;
            println!("Wrote {} rules to {}", dictionary.size(), file.display());
            Ok(())
        }
    }
}

struct KidTextApp {
    simplifier: Simplifier,
    config: PipelineConfig,
    config_status: Result<String, String>,
    input_text: String,
    result: Option<PipelineResult>,
    /// Answer of the simplification running in the background, if any.
    pending: Option<Receiver<kidtext::Result<PipelineResult>>>,
    warning: Option<String>,
    error: Option<String>,
    save_path: String,
    save_status: Option<String>,
}

impl KidTextApp {
    fn new(_cc: &eframe::CreationContext<'_>, config_path: &Path) -> Self {
        let loaded = load_config_or_default(config_path)
            .and_then(|settings| Simplifier::from_settings(&settings).map(|s| (settings, s)));
        let (simplifier, config, config_status) = match loaded {
            Ok((settings, simplifier)) => (
                simplifier,
                settings.pipeline,
                Ok(format!("Settings: {}", config_path.display())),
            ),
            Err(e) => {
                log::error!("Error loading {}: {}", config_path.display(), e);
                (
                    Simplifier::new(Arc::new(Collaborators::heuristic())),
                    PipelineConfig::default(),
                    Err(format!("{} (using defaults)", e)),
                )
            }
        };

        Self {
            simplifier,
            config,
            config_status,
            input_text: String::new(),
            result: None,
            pending: None,
            warning: None,
            error: None,
            save_path: "simplified.txt".to_string(),
            save_status: None,
        }
    }

    /// Runs the pipeline off the UI thread; a slow generator must not freeze
    /// the window.
    fn start_simplify(&mut self, ctx: &egui::Context) {
        self.warning = None;
        self.error = None;
        self.save_status = None;

        let ctx = ctx.clone();
        let started = self.simplifier.simplify_in_background(
            self.input_text.clone(),
            self.config.clone(),
            move || ctx.request_repaint(),
        );
        match started {
            Ok(rx) => self.pending = Some(rx),
            Err(e) => self.error = Some(e.to_string()),
        }
    }

    fn poll_simplify(&mut self) {
        let Some(rx) = &self.pending else { return };
        let outcome = match rx.try_recv() {
            Ok(outcome) => outcome,
            Err(TryRecvError::Empty) => return,
            Err(TryRecvError::Disconnected) => {
                Err(Error::internal("the simplification worker stopped"))
            }
        };
        self.pending = None;
        match outcome {
            Ok(result) => self.result = Some(result),
            Err(Error::EmptyInput) => {
                self.result = None;
                self.warning = Some(Error::EmptyInput.to_string());
            }
            Err(e) => {
                self.result = None;
                self.error = Some(e.to_string());
            }
        }
    }

    fn save_result(&mut self) {
        let Some(result) = &self.result else { return };
        self.save_status = Some(match fs::write(&self.save_path, &result.text) {
            Ok(()) => format!("Saved to {}", self.save_path),
            Err(e) => format!("Could not save: {}", e),
        });
    }
}

impl App for KidTextApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.poll_simplify();

        egui::TopBottomPanel::top("top_panel").show(ctx, |ui| {
            egui::menu::bar(ui, |ui| {
                ui.menu_button("File", |ui| {
                    if ui.button("Exit").clicked() {
                        ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                    }
                });
            });
        });

        egui::SidePanel::left("side_panel_left").min_width(220.0).default_width(260.0).show(ctx, |ui| {
            ui.heading("Settings");
            ui.separator();
            match &self.config_status {
                Ok(status) => ui.colored_label(egui::Color32::GREEN, status),
                Err(err) => ui.colored_label(egui::Color32::RED, err),
            };
            ui.separator();

            ui.add(egui::Slider::new(&mut self.config.strength, 1..=5).text("Strength"));
            ui.checkbox(&mut self.config.humanize, "Make it chatty");
            ui.checkbox(&mut self.config.use_generative_model, "Use the AI rewriter");
            ui.checkbox(&mut self.config.aggressive_shortening, "Make it shorter");
            ui.checkbox(&mut self.config.correct_grammar, "Fix spelling first");
            ui.horizontal(|ui| {
                ui.label("Split sentences over:");
                ui.add(egui::DragValue::new(&mut self.config.sentence_length_threshold).speed(1.0).clamp_range(5..=40));
                ui.label("words");
            });

            ui.collapsing("Humanizer", |ui| {
                let h = &mut self.config.humanizer;
                ui.checkbox(&mut h.contractions, "Contractions");
                ui.horizontal(|ui| {ui.label("Opener chance:"); ui.add(egui::DragValue::new(&mut h.opener_probability).speed(0.01).clamp_range(0.0..=1.0));});
                ui.horizontal(|ui| {ui.label("Emoji chance:"); ui.add(egui::DragValue::new(&mut h.emoji_probability).speed(0.01).clamp_range(0.0..=1.0));});
                ui.horizontal(|ui| {ui.label("Playful spelling:"); ui.add(egui::DragValue::new(&mut h.playful_spelling_probability).speed(0.01).clamp_range(0.0..=1.0));});
            });
            ui.separator();
            ui.label(format!("Easy words known: {}", self.simplifier.dictionary().size()));
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.columns(2, |columns| {
                columns[0].heading("Your text");
                columns[0].separator();
                egui::ScrollArea::vertical().id_source("input_scroll").max_height(500.0).show(&mut columns[0], |ui| {
                    ui.add(egui::TextEdit::multiline(&mut self.input_text)
                        .desired_rows(20)
                        .desired_width(f32::INFINITY)
                        .hint_text("Paste something to simplify..."));
                });
                let busy = self.pending.is_some();
                columns[0].horizontal(|ui| {
                    if ui.add_enabled(!busy, egui::Button::new("Simplify!")).clicked() {
                        self.start_simplify(ctx);
                    }
                    if busy {
                        ui.spinner();
                        ui.label("Simplifying...");
                    }
                });
                if let Some(warning) = &self.warning {
                    columns[0].colored_label(egui::Color32::YELLOW, warning);
                }
                if let Some(err) = &self.error {
                    columns[0].colored_label(egui::Color32::RED, format!("Something went wrong: {}", err));
                }

                columns[1].heading("Simplified");
                columns[1].separator();
                match &self.result {
                    Some(result) => {
                        let mut shown = result.text.clone();
                        egui::ScrollArea::vertical().id_source("output_scroll").max_height(500.0).show(&mut columns[1], |ui| {
                            ui.add(egui::TextEdit::multiline(&mut shown)
                                .desired_rows(20)
                                .desired_width(f32::INFINITY)
                                .interactive(false));
                        });
                        if let Some(report) = &result.readability {
                            columns[1].label(format!(
                                "Grade level {:.1} | Reading ease {:.1} | {} sentences, {} words",
                                report.grade_level, report.ease_score, report.sentences, report.words
                            ));
                        }
                    }
                    None => {
                        columns[1].label("Click 'Simplify!' to see the result.");
                    }
                }
                columns[1].horizontal(|ui| {
                    ui.text_edit_singleline(&mut self.save_path);
                    if ui.add_enabled(self.result.is_some(), egui::Button::new("Save Result")).clicked() {
                        self.save_result();
                    }
                });
                if let Some(status) = &self.save_status {
                    columns[1].label(status);
                }
            });
        });
    }
}

fn run_gui(config_path: PathBuf) -> Result<(), eframe::Error> {
    let options = NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 760.0])
            .with_min_inner_size([800.0, 500.0]),
        ..Default::default()
    };
    eframe::run_native(
        "Kid Text Simplifier",
        options,
        Box::new(move |cc| Box::new(KidTextApp::new(cc, &config_path))),
    )
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let Some(command) = &cli.command else {
        return match run_gui(cli.config.clone()) {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => {
                eprintln!("Error: {}", e);
                ExitCode::FAILURE
            }
        };
    };

    let outcome = load_config_or_default(&cli.config).and_then(|settings| run_cli(&settings, command));
    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(Error::EmptyInput) => {
            eprintln!("{}", Error::EmptyInput);
            ExitCode::from(2)
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
//*** END FILE: src/main.rs ***//

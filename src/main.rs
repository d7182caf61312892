mod cli;

use shoptrack::{
    config,
    images::{encode_data_url, ImageFile, ImageNormalizer, NormalizerSettings},
    prompt::{Prompt, TerminalPrompt},
    store::Store,
    tracker::{mechanics_in_use, TaskFilter, TaskStats, Tracker},
};
use shoptrack_common::{paths::media_type_for_path, Task, TaskDraft, TaskId};

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Commands, ImageCommand, MechanicCommand, TaskCommand};
use std::path::{Path, PathBuf};
use std::sync::Arc;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Respect RUST_LOG env var if set, otherwise use defaults based on verbose flag
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| {
        if cli.verbose {
            "shoptrack=trace,shoptrack_db=debug,shoptrack_common=debug".to_string()
        } else {
            "shoptrack=warn,shoptrack_db=warn".to_string()
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(&env_filter)
        .with_writer(std::io::stderr)
        .init();

    let config_path = cli.config.as_deref();

    match cli.command {
        Commands::Task { action } => {
            let config = config::load_config_or_default(config_path)?;
            let tracker = open_tracker(&config, cli.yes)?;
            run_task_command(&tracker, action)
        }
        Commands::Mechanic { action } => {
            let config = config::load_config_or_default(config_path)?;
            let tracker = open_tracker(&config, cli.yes)?;
            run_mechanic_command(&tracker, action)
        }
        Commands::Export { dir } => {
            let config = config::load_config_or_default(config_path)?;
            let tracker = open_tracker(&config, cli.yes)?;
            let dir = dir.unwrap_or_else(|| config.export.dir.clone());
            let path = tracker.export(&dir)?;
            println!("{}", path.display());
            Ok(())
        }
        Commands::Import { file } => {
            let config = config::load_config_or_default(config_path)?;
            let tracker = open_tracker(&config, cli.yes)?;
            import_backup(&tracker, &file)
        }
        Commands::Clear => {
            let config = config::load_config_or_default(config_path)?;
            let tracker = open_tracker(&config, cli.yes)?;
            if tracker.clear_all() {
                println!("All data deleted");
            } else {
                println!("Cancelled");
            }
            Ok(())
        }
        Commands::Image { action } => {
            let config = config::load_config_or_default(config_path)?;
            let normalizer = ImageNormalizer::new(NormalizerSettings::from(&config.images));
            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(run_image_command(&normalizer, action))
        }
        Commands::Validate {
            config: validate_path,
        } => {
            let path = validate_path.or_else(|| config_path.map(Path::to_path_buf));
            validate_config(path.as_deref())
        }
        Commands::Version => {
            println!("shoptrack {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}

fn open_tracker(config: &config::Config, assume_yes: bool) -> Result<Tracker> {
    let kv = config.storage.open()?;
    let prompt: Arc<dyn Prompt> = Arc::new(TerminalPrompt::new(assume_yes));
    let store = Store::new(kv, prompt.clone());
    let images = ImageNormalizer::new(NormalizerSettings::from(&config.images));
    Ok(Tracker::new(store, prompt, images))
}

fn run_task_command(tracker: &Tracker, action: TaskCommand) -> Result<()> {
    match action {
        TaskCommand::Add {
            title,
            mechanic,
            items,
            status,
            vehicle,
            hours,
            photos,
        } => {
            let draft = TaskDraft {
                title,
                checklist: items,
                mechanic,
                status,
                vehicle_info: vehicle,
                estimated_hours: hours,
                photos: Vec::new(),
            };

            let task = if photos.is_empty() {
                tracker.create_task(draft)?
            } else {
                let rt = tokio::runtime::Runtime::new()?;
                rt.block_on(async {
                    let files = read_photos(&photos).await?;
                    Ok::<_, anyhow::Error>(tracker.create_task_with_photos(draft, &files).await?)
                })?
            };

            println!("{}", task.id);
            Ok(())
        }
        TaskCommand::List {
            mechanic,
            status,
            search,
            json,
        } => {
            let filter = TaskFilter {
                mechanic,
                status,
                search,
            };
            let tasks = tracker.filter(&filter);

            if json {
                println!("{}", serde_json::to_string_pretty(&tasks)?);
                return Ok(());
            }

            let stats = TaskStats::from_tasks(&tasks);
            println!(
                "{} tasks ({} pending, {} in progress, {} completed)",
                stats.total, stats.pending, stats.in_progress, stats.completed
            );
            for task in &tasks {
                println!(
                    "  {}  [{}] {} - {}",
                    task.id, task.status, task.title, task.mechanic
                );
            }

            let roster = tracker.mechanics();
            let orphaned: Vec<_> = mechanics_in_use(&tasks)
                .into_iter()
                .filter(|m| !roster.contains(m))
                .collect();
            if !orphaned.is_empty() {
                println!("\nNot on the roster: {}", orphaned.join(", "));
            }
            Ok(())
        }
        TaskCommand::Show { id, json } => {
            let task = tracker.get_task(&TaskId::from(id))?;
            if json {
                println!("{}", serde_json::to_string_pretty(&task)?);
            } else {
                print_task(&task);
            }
            Ok(())
        }
        TaskCommand::Update {
            id,
            title,
            mechanic,
            items,
            status,
            vehicle,
            hours,
        } => {
            let id = TaskId::from(id);
            let mut draft = TaskDraft::from(tracker.get_task(&id)?);
            if let Some(title) = title {
                draft.title = title;
            }
            if let Some(mechanic) = mechanic {
                draft.mechanic = mechanic;
            }
            if !items.is_empty() {
                draft.checklist = items;
            }
            if let Some(status) = status {
                draft.status = status;
            }
            if let Some(vehicle) = vehicle {
                draft.vehicle_info = Some(vehicle);
            }
            if let Some(hours) = hours {
                draft.estimated_hours = Some(hours);
            }

            let task = tracker.update_task(&id, draft)?;
            print_task(&task);
            Ok(())
        }
        TaskCommand::Delete { id } => {
            if tracker.delete_task(&TaskId::from(id))? {
                println!("Deleted");
            } else {
                println!("Cancelled");
            }
            Ok(())
        }
        TaskCommand::Attach { id, files } => {
            let id = TaskId::from(id);
            let rt = tokio::runtime::Runtime::new()?;
            let task = rt.block_on(async {
                let files = read_photos(&files).await?;
                Ok::<_, anyhow::Error>(tracker.attach_photos(&id, &files).await?)
            })?;
            println!("{} photos attached to {}", task.photos.len(), task.id);
            Ok(())
        }
        TaskCommand::Detach { id, index } => {
            let task = tracker.remove_photo(&TaskId::from(id), index)?;
            println!("{} photos left on {}", task.photos.len(), task.id);
            Ok(())
        }
    }
}

async fn read_photos(paths: &[PathBuf]) -> Result<Vec<ImageFile>> {
    let mut files = Vec::with_capacity(paths.len());
    for path in paths {
        let file = ImageFile::from_path(path)
            .await
            .with_context(|| format!("Failed to read photo: {:?}", path))?;
        files.push(file);
    }
    Ok(files)
}

fn print_task(task: &Task) {
    println!("ID:        {}", task.id);
    println!("Title:     {}", task.title);
    println!("Mechanic:  {}", task.mechanic);
    println!("Status:    {}", task.status);
    if let Some(ref vehicle) = task.vehicle_info {
        println!("Vehicle:   {}", vehicle);
    }
    if let Some(hours) = task.estimated_hours {
        println!("Estimate:  {} h", hours);
    }
    println!("Created:   {}", task.created_at.to_rfc3339());
    println!("Updated:   {}", task.updated_at.to_rfc3339());
    println!("Photos:    {}", task.photos.len());
    for (i, photo) in task.photos.iter().enumerate() {
        println!("  [{}] {} bytes", i, photo.len());
    }
    if !task.checklist.is_empty() {
        println!("Checklist:");
        for item in &task.checklist {
            println!("  - {}", item);
        }
    }
}

fn run_mechanic_command(tracker: &Tracker, action: MechanicCommand) -> Result<()> {
    match action {
        MechanicCommand::List => {
            for name in tracker.mechanics() {
                println!("{}", name);
            }
        }
        MechanicCommand::Add { name } => {
            if tracker.add_mechanic(&name)? {
                println!("Added {}", name.trim());
            } else {
                println!("{} is already on the roster", name.trim());
            }
        }
        MechanicCommand::Remove { name } => {
            if tracker.remove_mechanic(&name) {
                println!("Removed {}", name);
            } else {
                println!("{} was not removed", name);
            }
        }
    }
    Ok(())
}

fn import_backup(tracker: &Tracker, file: &Path) -> Result<()> {
    let contents = std::fs::read_to_string(file)
        .with_context(|| format!("Failed to read backup: {:?}", file))?;
    let outcome = tracker
        .import(&contents)
        .with_context(|| format!("Invalid backup file: {:?}", file))?;

    if let Some(ref tasks) = outcome.tasks {
        println!("Imported {} tasks", tasks.len());
    }
    if let Some(ref mechanics) = outcome.mechanics {
        println!("Imported {} mechanics", mechanics.len());
    }
    if !outcome.persisted {
        anyhow::bail!("Backup was read but could not be fully saved");
    }
    Ok(())
}

async fn run_image_command(normalizer: &ImageNormalizer, action: ImageCommand) -> Result<()> {
    match action {
        ImageCommand::Compress {
            input,
            output,
            max_width,
            max_height,
            quality,
        } => {
            let file = ImageFile::from_path(&input)
                .await
                .with_context(|| format!("Failed to read image: {:?}", input))?;
            normalizer.validate(Some(&file))?;

            let settings = normalizer.settings();
            let encoded = normalizer
                .compress_with(
                    &file,
                    max_width.unwrap_or(settings.max_width),
                    max_height.unwrap_or(settings.max_height),
                    quality.unwrap_or(settings.quality),
                )
                .await?;
            write_output(output.as_deref(), &encoded)
        }
        ImageCommand::Thumbnail {
            input,
            output,
            size,
        } => {
            let encoded = read_as_data_url(&input).await?;
            let size = size.unwrap_or(normalizer.settings().thumbnail_size);
            let thumb = normalizer.thumbnail_with(&encoded, size).await?;
            write_output(output.as_deref(), &thumb)
        }
        ImageCommand::Info { input } => {
            let encoded = read_as_data_url(&input).await?;
            let dims = normalizer.dimensions(&encoded).await?;
            println!("{}x{}", dims.width, dims.height);
            Ok(())
        }
    }
}

/// Accept either an image file or a text file that already holds a data URL.
async fn read_as_data_url(path: &Path) -> Result<String> {
    let data = tokio::fs::read(path)
        .await
        .with_context(|| format!("Failed to read image: {:?}", path))?;

    if data.starts_with(b"data:") {
        let text = String::from_utf8(data).context("Data URL file is not valid UTF-8")?;
        return Ok(text.trim().to_string());
    }

    Ok(encode_data_url(media_type_for_path(path), &data))
}

fn write_output(output: Option<&Path>, contents: &str) -> Result<()> {
    match output {
        Some(path) => {
            std::fs::write(path, contents)
                .with_context(|| format!("Failed to write output: {:?}", path))?;
            println!("{}", path.display());
        }
        None => println!("{}", contents),
    }
    Ok(())
}

fn validate_config(path: Option<&Path>) -> Result<()> {
    let config = match path {
        Some(p) => {
            println!("Validating config: {:?}", p);
            let config = config::load_config(p)?;
            println!("✓ Configuration is valid");
            config
        }
        None => {
            println!("No config file specified, using defaults");
            config::Config::default()
        }
    };

    println!("  Storage: {:?}", config.storage.backend);
    println!("  Path: {}", config.storage.resolved_path().display());
    println!("  Quota: {} bytes", config.storage.quota_bytes);
    println!(
        "  Photos: {}x{} @ {}",
        config.images.max_width, config.images.max_height, config.images.quality
    );
    println!("  Export dir: {}", config.export.dir.display());

    Ok(())
}

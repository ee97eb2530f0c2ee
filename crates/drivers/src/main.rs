mod config;
mod logging;

use std::path::PathBuf;
use std::process::ExitCode;

use config::{AppConfig, CameraBackend};
use log::debug;
#[cfg(feature = "native-camera")]
use scopecap_adapters::NativeCameraProvider;
use scopecap_adapters::{
    present_capture, present_dimensions, present_project_details, present_project_row,
    FsProjectStorage, ImageCrateCodec, ImageCrateEditor, JsonCatalogStore,
    PatternCameraProvider, SystemClock,
};
use scopecap_application::{
    ApplicationError, BeginSyncCommand, CameraProvider, BootstrapCommand, CaptureCommand, CaptureSession,
    CreateProjectCommand, DeleteImageCommand, DeleteProjectCommand, ListImagesCommand,
    ListProjectsCommand, OpenEditorCommand, ProjectService, ShowProjectCommand,
};
use scopecap_domain::{CropRect, Point, Stroke};
use thiserror::Error;

fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    logging::init_logging();
    let args: Vec<String> = std::env::args().collect();

    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(error) => {
            eprintln!("{error}");
            return ExitCode::from(2);
        }
    };
    debug!("using {config:?}");

    let mut services = match build_services(&config) {
        Ok(services) => services,
        Err(error) => {
            eprintln!("failed to start scopecap: {error}");
            return ExitCode::from(1);
        }
    };
    if let Err(error) = services.projects.bootstrap(BootstrapCommand) {
        eprintln!("failed to bootstrap scopecap: {error}");
        return ExitCode::from(1);
    }

    let command = parse_command(&args);
    match run_command(command, &mut services, &config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(CommandError::Usage(msg)) => {
            eprintln!("{msg}");
            print_usage();
            ExitCode::from(2)
        }
        Err(CommandError::Runtime(msg)) => {
            eprintln!("{msg}");
            ExitCode::from(1)
        }
    }
}

struct Services {
    projects: ProjectService,
    capture: CaptureSession,
}

fn build_services(config: &AppConfig) -> Result<Services, ApplicationError> {
    let projects = ProjectService::new(
        Box::new(JsonCatalogStore::new(config.catalog_path.clone())),
        Box::new(FsProjectStorage::new(config.projects_root.clone())),
        Box::new(ImageCrateEditor),
        Box::new(SystemClock),
    );
    let capture = CaptureSession::new(
        camera_provider(config.camera_backend),
        Box::new(ImageCrateCodec),
        Box::new(SystemClock),
        &config.capture_extension,
    )?;
    Ok(Services { projects, capture })
}

fn camera_provider(backend: CameraBackend) -> Box<dyn CameraProvider> {
    debug!("using {backend:?} camera backend");
    match backend {
        #[cfg(feature = "native-camera")]
        CameraBackend::Native => Box::new(NativeCameraProvider::new()),
        CameraBackend::Pattern => Box::new(PatternCameraProvider::new(vec![0])),
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
struct EditOptions {
    crop: Option<CropRect>,
    stroke: Option<Stroke>,
    resize: Option<u32>,
    zoom: i32,
    out: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq)]
enum Command {
    Projects,
    Create { name: String, description: String },
    Delete { name: String },
    Show { name: String },
    Images { name: String },
    DeleteImage { name: String, file_name: String },
    Cameras,
    Capture { name: String, count: u32 },
    Edit {
        name: String,
        file_name: String,
        options: EditOptions,
    },
    Sync { name: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
enum CommandError {
    #[error("{0}")]
    Usage(String),
    #[error("{0}")]
    Runtime(String),
}

fn parse_command(args: &[String]) -> Result<Command, CommandError> {
    let Some(verb) = args.get(1) else {
        return Err(CommandError::Usage("missing command".to_string()));
    };
    let rest = &args[2..];

    match verb.as_str() {
        "projects" => Ok(Command::Projects),
        "create" => Ok(Command::Create {
            name: required(rest, 0, "missing project name")?,
            description: rest.get(1..).map(|words| words.join(" ")).unwrap_or_default(),
        }),
        "delete" => Ok(Command::Delete {
            name: required(rest, 0, "missing project name")?,
        }),
        "show" => Ok(Command::Show {
            name: required(rest, 0, "missing project name")?,
        }),
        "images" => Ok(Command::Images {
            name: required(rest, 0, "missing project name")?,
        }),
        "delete-image" => Ok(Command::DeleteImage {
            name: required(rest, 0, "missing project name")?,
            file_name: required(rest, 1, "missing image file name")?,
        }),
        "cameras" => Ok(Command::Cameras),
        "capture" => {
            let name = required(rest, 0, "missing project name")?;
            let count = match rest.get(1) {
                Some(value) => value
                    .parse::<u32>()
                    .ok()
                    .filter(|count| *count > 0)
                    .ok_or_else(|| CommandError::Usage(format!("invalid capture count: {value}")))?,
                None => 1,
            };
            Ok(Command::Capture { name, count })
        }
        "edit" => Ok(Command::Edit {
            name: required(rest, 0, "missing project name")?,
            file_name: required(rest, 1, "missing image file name")?,
            options: parse_edit_options(rest.get(2..).unwrap_or_default())?,
        }),
        "sync" => Ok(Command::Sync {
            name: required(rest, 0, "missing project name")?,
        }),
        other => Err(CommandError::Usage(format!("unknown command: {other}"))),
    }
}

fn required(args: &[String], index: usize, message: &str) -> Result<String, CommandError> {
    args.get(index)
        .cloned()
        .ok_or_else(|| CommandError::Usage(message.to_string()))
}

fn parse_edit_options(args: &[String]) -> Result<EditOptions, CommandError> {
    let mut options = EditOptions::default();
    let mut iter = args.iter();
    while let Some(flag) = iter.next() {
        let value = iter
            .next()
            .ok_or_else(|| CommandError::Usage(format!("missing value for {flag}")))?;
        match flag.as_str() {
            "--crop" => {
                let numbers = parse_numbers(value, ',')?;
                let [x1, y1, x2, y2] = numbers[..] else {
                    return Err(CommandError::Usage(format!(
                        "--crop expects x1,y1,x2,y2, got {value}"
                    )));
                };
                options.crop = Some(CropRect::from_corners(
                    Point::new(x1, y1),
                    Point::new(x2, y2),
                ));
            }
            "--stroke" => {
                let points = value
                    .split(';')
                    .map(|pair| match parse_numbers(pair, ',')?[..] {
                        [x, y] => Ok(Point::new(x, y)),
                        _ => Err(CommandError::Usage(format!("invalid stroke point: {pair}"))),
                    })
                    .collect::<Result<Vec<_>, _>>()?;
                options.stroke = Some(Stroke::new(points));
            }
            "--resize" => {
                let width = value
                    .parse::<u32>()
                    .map_err(|_| CommandError::Usage(format!("invalid width: {value}")))?;
                options.resize = Some(width);
            }
            "--zoom" => {
                options.zoom = value
                    .parse::<i32>()
                    .map_err(|_| CommandError::Usage(format!("invalid zoom steps: {value}")))?;
            }
            "--out" => options.out = Some(PathBuf::from(value)),
            other => return Err(CommandError::Usage(format!("unknown edit option: {other}"))),
        }
    }
    Ok(options)
}

fn parse_numbers(value: &str, separator: char) -> Result<Vec<i64>, CommandError> {
    value
        .split(separator)
        .map(|part| {
            part.trim()
                .parse::<i64>()
                .map_err(|_| CommandError::Usage(format!("invalid number in {value}")))
        })
        .collect()
}

fn runtime(context: &str) -> impl Fn(ApplicationError) -> CommandError + '_ {
    move |error| match error {
        ApplicationError::InvalidInput(_) | ApplicationError::Domain(_) => {
            CommandError::Usage(format!("{context}: {error}"))
        }
        other => CommandError::Runtime(format!("{context}: {other}")),
    }
}

fn run_command(
    command: Result<Command, CommandError>,
    services: &mut Services,
    config: &AppConfig,
) -> Result<(), CommandError> {
    let projects = &services.projects;
    match command? {
        Command::Projects => {
            let records = projects
                .list_projects(ListProjectsCommand {
                    reconcile: config.reconcile_on_list,
                })
                .map_err(runtime("list failed"))?;
            if records.is_empty() {
                println!("no projects in catalog");
                return Ok(());
            }
            for record in records {
                println!("{}", present_project_row(&record));
            }
            Ok(())
        }
        Command::Create { name, description } => {
            let record = projects
                .create_project(CreateProjectCommand { name, description })
                .map_err(runtime("create failed"))?;
            println!("Project '{}' created successfully!", record.name);
            Ok(())
        }
        Command::Delete { name } => {
            projects
                .delete_project(DeleteProjectCommand { name: name.clone() })
                .map_err(runtime("delete failed"))?;
            println!("Project '{name}' deleted successfully!");
            Ok(())
        }
        Command::Show { name } => {
            let record = projects
                .find_project(ShowProjectCommand { name })
                .map_err(runtime("show failed"))?;
            println!("{}", present_project_details(&record));
            Ok(())
        }
        Command::Images { name } => {
            let mut images = projects
                .list_images(ListImagesCommand { project: name })
                .map_err(runtime("list images failed"))?;
            images.sort();
            for image in images {
                println!("{image}");
            }
            Ok(())
        }
        Command::DeleteImage { name, file_name } => {
            let record = projects
                .delete_image(DeleteImageCommand {
                    project: name,
                    file_name: file_name.clone(),
                })
                .map_err(runtime("delete image failed"))?;
            println!(
                "deleted {file_name}, {} file(s) left in {}",
                record.total_data, record.name
            );
            Ok(())
        }
        Command::Cameras => {
            let devices = services
                .capture
                .enumerate_devices(config.camera_probe_limit);
            if devices.is_empty() {
                println!("no cameras found");
            }
            for device in devices {
                println!("Camera {device}");
            }
            Ok(())
        }
        Command::Capture { name, count } => {
            services
                .capture
                .connect(config.default_device)
                .map_err(runtime("connect failed"))?;
            for _ in 0..count {
                let report = services
                    .capture
                    .capture(
                        &services.projects,
                        CaptureCommand {
                            project: name.clone(),
                        },
                    )
                    .map_err(runtime("capture failed"))?;
                println!("{}", present_capture(&report));
            }
            services.capture.disconnect();
            Ok(())
        }
        Command::Edit {
            name,
            file_name,
            options,
        } => {
            let mut session = projects
                .open_editor(OpenEditorCommand {
                    project: name,
                    file_name,
                })
                .map_err(runtime("open failed"))?;
            if let Some(rect) = options.crop {
                session.crop(rect).map_err(runtime("crop failed"))?;
            }
            if let Some(stroke) = &options.stroke {
                session
                    .draw_stroke(stroke)
                    .map_err(runtime("stroke failed"))?;
            }
            if let Some(width) = options.resize {
                session
                    .resize_to_width(width)
                    .map_err(runtime("resize failed"))?;
            }
            for _ in 0..options.zoom.unsigned_abs() {
                if options.zoom > 0 {
                    session.zoom_in();
                } else {
                    session.zoom_out();
                }
            }
            let out = options.out.clone().unwrap_or_else(|| {
                session
                    .source_path()
                    .with_file_name(session.default_save_name())
            });
            session
                .save(&out, options.zoom != 0)
                .map_err(runtime("save failed"))?;
            let dimensions = if options.zoom != 0 {
                session.display_dimensions()
            } else {
                session.dimensions()
            };
            println!(
                "{} to {}",
                present_dimensions("saved", dimensions),
                out.display()
            );
            Ok(())
        }
        Command::Sync { name } => {
            let record = projects
                .begin_sync(BeginSyncCommand { project: name })
                .map_err(runtime("sync failed"))?;
            println!("Sync Status: {}", record.sync_status);
            Ok(())
        }
    }
}

fn print_usage() {
    println!("usage:");
    println!("  scopecap projects");
    println!("  scopecap create <name> [description...]");
    println!("  scopecap delete <name>");
    println!("  scopecap show <name>");
    println!("  scopecap images <name>");
    println!("  scopecap delete-image <name> <file>");
    println!("  scopecap cameras");
    println!("  scopecap capture <name> [count]");
    println!(
        "  scopecap edit <name> <file> [--crop x1,y1,x2,y2] [--stroke x,y;x,y...] [--resize W] [--zoom N] [--out PATH]"
    );
    println!("  scopecap sync <name>");
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn args(parts: &[&str]) -> Vec<String> {
        std::iter::once("scopecap")
            .chain(parts.iter().copied())
            .map(str::to_string)
            .collect()
    }

    fn temp_config(dir: &TempDir) -> AppConfig {
        AppConfig {
            catalog_path: dir.path().join("projects.json").to_string_lossy().to_string(),
            projects_root: dir.path().join("projects").to_string_lossy().to_string(),
            camera_backend: CameraBackend::Pattern,
            ..AppConfig::default()
        }
    }

    #[test]
    fn parse_create_joins_description_words() {
        let command = parse_command(&args(&["create", "slide-1", "blood", "smear"]))
            .expect("create should parse");
        assert_eq!(
            command,
            Command::Create {
                name: "slide-1".to_string(),
                description: "blood smear".to_string(),
            }
        );
    }

    #[test]
    fn parse_capture_rejects_zero_count() {
        let command = parse_command(&args(&["capture", "slide-1", "0"]));
        assert!(matches!(command, Err(CommandError::Usage(_))));
        let command = parse_command(&args(&["capture", "slide-1"])).expect("capture");
        assert_eq!(
            command,
            Command::Capture {
                name: "slide-1".to_string(),
                count: 1,
            }
        );
    }

    #[test]
    fn parse_edit_collects_options() {
        let command = parse_command(&args(&[
            "edit",
            "slide-1",
            "a.jpg",
            "--crop",
            "30,25,10,5",
            "--stroke",
            "1,1;4,4",
            "--resize",
            "100",
            "--zoom",
            "-2",
        ]))
        .expect("edit should parse");
        let Command::Edit { options, .. } = command else {
            panic!("expected edit command");
        };
        assert_eq!(
            options.crop,
            Some(CropRect::from_corners(Point::new(10, 5), Point::new(30, 25)))
        );
        assert_eq!(
            options.stroke.map(|stroke| stroke.points.len()),
            Some(2)
        );
        assert_eq!(options.resize, Some(100));
        assert_eq!(options.zoom, -2);
        assert!(options.out.is_none());
    }

    #[test]
    fn parse_edit_rejects_malformed_crop() {
        let command = parse_command(&args(&["edit", "p", "a.jpg", "--crop", "1,2,3"]));
        assert!(matches!(command, Err(CommandError::Usage(_))));
        let command = parse_command(&args(&["edit", "p", "a.jpg", "--crop"]));
        assert!(matches!(command, Err(CommandError::Usage(_))));
    }

    #[test]
    fn unknown_and_missing_commands_are_usage_errors() {
        assert!(matches!(
            parse_command(&args(&[])),
            Err(CommandError::Usage(_))
        ));
        assert!(matches!(
            parse_command(&args(&["import"])),
            Err(CommandError::Usage(_))
        ));
        assert!(matches!(
            parse_command(&args(&["delete-image", "slide-1"])),
            Err(CommandError::Usage(_))
        ));
    }

    #[test]
    fn commands_drive_the_catalog() {
        let dir = TempDir::new().expect("tempdir");
        let config = temp_config(&dir);
        let mut services = build_services(&config).expect("services");
        services
            .projects
            .bootstrap(BootstrapCommand)
            .expect("bootstrap");

        for parts in [
            &["create", "slide-1", "test"][..],
            &["capture", "slide-1", "2"][..],
            &["sync", "slide-1"][..],
        ] {
            run_command(parse_command(&args(parts)), &mut services, &config)
                .expect("command should succeed");
        }

        let record = services
            .projects
            .find_project(ShowProjectCommand {
                name: "slide-1".to_string(),
            })
            .expect("project");
        assert_eq!(record.total_data, 2);
        assert_eq!(record.sync_status.to_string(), "Syncing");

        let duplicate = run_command(
            parse_command(&args(&["create", "slide-1"])),
            &mut services,
            &config,
        );
        assert!(matches!(duplicate, Err(CommandError::Runtime(_))));
        let empty_name = run_command(
            parse_command(&args(&["create", ""])),
            &mut services,
            &config,
        );
        assert!(matches!(empty_name, Err(CommandError::Usage(_))));
    }

    #[test]
    fn edit_command_writes_edited_copy() {
        let dir = TempDir::new().expect("tempdir");
        let config = temp_config(&dir);
        let mut services = build_services(&config).expect("services");
        services
            .projects
            .bootstrap(BootstrapCommand)
            .expect("bootstrap");
        run_command(
            parse_command(&args(&["create", "slide-1"])),
            &mut services,
            &config,
        )
        .expect("create");
        run_command(
            parse_command(&args(&["capture", "slide-1"])),
            &mut services,
            &config,
        )
        .expect("capture");
        let images = services
            .projects
            .list_images(ListImagesCommand {
                project: "slide-1".to_string(),
            })
            .expect("images");
        let out = dir.path().join("edited.png");
        let out_arg = out.to_string_lossy().to_string();

        run_command(
            parse_command(&args(&[
                "edit",
                "slide-1",
                images[0].as_str(),
                "--crop",
                "0,0,320,240",
                "--resize",
                "160",
                "--out",
                out_arg.as_str(),
            ])),
            &mut services,
            &config,
        )
        .expect("edit");

        let saved = scopecap_adapters::read_frame(&out).expect("decode");
        assert_eq!((saved.width(), saved.height()), (160, 120));
    }
}

//! Command routing and execution
//!
//! Routes parsed CLI commands to their implementations. Each handler
//! validates its environment first, captures the invocation timestamp once,
//! and only then starts reading input or talking to the platform.

use crate::api::HttpPlatformClient;
use crate::assign::{self, PipelineOptions, REPORT_HEADER};
use crate::cli::args::Commands;
use crate::cli::validation::{validate_input_file, validate_output_dir};
use crate::config::Settings;
use crate::report::{self, ReportWriter};
use crate::subprocess::TokioProcessRunner;
use crate::{content, convert, courses, groups, records, template};
use anyhow::{bail, Result};
use chrono::Local;
use std::path::PathBuf;

/// Execute a CLI command based on the parsed arguments.
pub async fn execute_command(command: Option<Commands>) -> Result<()> {
    match command {
        Some(Commands::Assign {
            instance_url,
            courses,
            groups,
            output_dir,
            token,
            keep_going,
            timeout,
            retries,
            config,
        }) => {
            run_assign(AssignParams {
                instance_url,
                courses,
                groups,
                output_dir,
                token,
                keep_going,
                timeout,
                retries,
                config,
            })
            .await
        }
        Some(Commands::ExtractGroups { input, output_dir }) => {
            run_extract_groups(input, output_dir)
        }
        Some(Commands::ListGroups {
            instance_url,
            output_dir,
            token,
        }) => run_list_groups(instance_url, output_dir, token).await,
        Some(Commands::CountGroups {
            instance_url,
            token,
        }) => run_count_groups(instance_url, token).await,
        Some(Commands::FetchCourses {
            instance_url,
            output_dir,
            token,
        }) => run_fetch_courses(instance_url, output_dir, token).await,
        Some(Commands::Render {
            variables,
            input,
            output,
        }) => run_render(variables, input, output),
        Some(Commands::MergeHtml { directory }) => run_merge_html(directory),
        Some(Commands::Convert { converter, input }) => run_convert(converter, input).await,
        None => {
            use clap::CommandFactory;
            crate::cli::args::Cli::command().print_help()?;
            Ok(())
        }
    }
}

pub struct AssignParams {
    pub instance_url: String,
    pub courses: PathBuf,
    pub groups: PathBuf,
    pub output_dir: PathBuf,
    pub token: String,
    pub keep_going: bool,
    pub timeout: Option<u64>,
    pub retries: Option<u32>,
    pub config: Option<PathBuf>,
}

async fn run_assign(params: AssignParams) -> Result<()> {
    let settings = Settings::load(params.config.as_deref())?.with_overrides(
        params.keep_going,
        params.timeout,
        params.retries,
    );

    validate_input_file(&params.courses)?;
    validate_input_file(&params.groups)?;
    validate_output_dir(&params.output_dir)?;
    let client = HttpPlatformClient::new(&params.instance_url, params.token, &settings)?;

    // Both tables must parse in full before the report file exists; a
    // malformed row leaves no partial output behind.
    let courses = records::read_courses(&params.courses)?;
    let groups = records::read_groups(&params.groups)?;

    let now = Local::now().naive_local();
    let report_path = report::assignments_path(&params.output_dir, now);
    let mut writer = ReportWriter::create(&report_path, &REPORT_HEADER)?;

    let options = PipelineOptions {
        stop_on_first_error: settings.stop_on_first_error,
    };
    let summary = assign::assign(&courses, &groups, &client, &mut writer, &options).await?;

    if summary.halted {
        if let Some(failure) = summary.first_failure() {
            bail!(
                "API call failed for Group ID {}: {}",
                failure.group_id,
                failure.result
            );
        }
    }

    println!(
        "Course assignments saved successfully to {}",
        report_path.display()
    );

    let failures = summary
        .outcomes
        .iter()
        .filter(|o| o.result.is_failure())
        .count();
    if failures > 0 {
        bail!("{failures} submission(s) failed; see {}", report_path.display());
    }
    Ok(())
}

fn run_extract_groups(input: PathBuf, output_dir: PathBuf) -> Result<()> {
    validate_input_file(&input)?;
    validate_output_dir(&output_dir)?;

    let now = Local::now().naive_local();
    let (output, kept) = groups::extract(&input, &output_dir, now)?;
    println!(
        "Filtered groups ({kept}) saved successfully to {}",
        output.display()
    );
    Ok(())
}

async fn run_list_groups(instance_url: String, output_dir: PathBuf, token: String) -> Result<()> {
    validate_output_dir(&output_dir)?;
    let client = HttpPlatformClient::new(&instance_url, token, &Settings::default())?;
    let subdomain = client.subdomain()?;

    let now = Local::now().naive_local();
    let (output, total) = groups::export(&client, &subdomain, &output_dir, now).await?;
    println!("{total} groups saved successfully to {}", output.display());
    Ok(())
}

async fn run_count_groups(instance_url: String, token: String) -> Result<()> {
    let client = HttpPlatformClient::new(&instance_url, token, &Settings::default())?;
    let count = groups::count(&client).await?;
    println!("Number of groups: {count}");
    Ok(())
}

async fn run_fetch_courses(
    instance_url: String,
    output_dir: PathBuf,
    token: String,
) -> Result<()> {
    validate_output_dir(&output_dir)?;
    let client = HttpPlatformClient::new(&instance_url, token, &Settings::default())?;
    let subdomain = client.subdomain()?;

    let now = Local::now().naive_local();
    let (output, categories, count) = courses::fetch(
        &client,
        client.base_url(),
        &subdomain,
        &output_dir,
        now,
    )
    .await?;
    println!("{categories} categories and {count} courses retrieved.");
    println!("Data saved to {}", output.display());
    Ok(())
}

fn run_render(variables: PathBuf, input: PathBuf, output: PathBuf) -> Result<()> {
    validate_input_file(&variables)?;
    validate_input_file(&input)?;
    template::render_file(&variables, &input, &output)?;
    println!("Replacements done. Output saved to {}", output.display());
    Ok(())
}

fn run_merge_html(directory: PathBuf) -> Result<()> {
    validate_output_dir(&directory)?;
    let (output, merged) = content::merge_directory(&directory)?;
    println!("Merged {merged} fragments into {}", output.display());
    Ok(())
}

async fn run_convert(converter: PathBuf, input: PathBuf) -> Result<()> {
    let runner = TokioProcessRunner;
    convert::convert_path(&runner, &converter, &input).await?;
    Ok(())
}

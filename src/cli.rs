use transit_filters::Cli;

fn main() -> anyhow::Result<()> {
    Cli::run()
}

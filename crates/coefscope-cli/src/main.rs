mod command;
mod logging;
mod render;

fn main() -> anyhow::Result<()> {
    command::run()
}

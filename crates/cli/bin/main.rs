fn main() -> eyre::Result<()> {
    flexigift_cli::run()
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    taskchat::cli::main()
}

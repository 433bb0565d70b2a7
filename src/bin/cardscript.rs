fn main() -> ! {
    cardscript::cli_def::main(env!("CARGO_PKG_VERSION"));
}

//! spoolcost - Track what each 3D print costs in filament.

fn main() -> std::process::ExitCode {
    spoolcost::cmd::main()
}

fn main() -> anyhow::Result<()> {
    policy_scan_lib::run()
}

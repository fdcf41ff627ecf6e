use sheetpress_docs::OutputKind;

fn main() -> anyhow::Result<()> {
    sheetpress_app::main_for(OutputKind::Pdf)
}

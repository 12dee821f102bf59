use crate::cmd::FieldsArgs;
use crate::exit::{CliResult, SUCCESS};
use crate::output::{print_fields, OutputFormat};

pub fn run(args: FieldsArgs, format: OutputFormat) -> CliResult<i32> {
    let table = args.table.load()?;
    print_fields(&table, format)?;
    Ok(SUCCESS)
}

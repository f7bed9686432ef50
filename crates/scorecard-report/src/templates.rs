//! Code templates for the runtime, audit and integration sections.
//!
//! Each function returns complete lines, every line ending in `\n`.

use scorecard_model::{FullParameter, ParamType};

/// Value the engine returns for a variable it could not compute.
const MISSING_SENTINEL: &str = "-99999";

/// Fetch the engine value and fall back to the spreadsheet method.
pub fn runtime_logic(param: &FullParameter) -> String {
    let name = &param.name;
    let method = &param.method;
    match param.param_type {
        ParamType::Decimal => format!(
            "xScoreInput.{name} := dmi_App_Get_ScoreVariableValue(\"#{name}\");\n\
             if(xScoreInput.{name} = {MISSING_SENTINEL}) then\n    \
             xScoreInput.{name} = {method};\n\
             endif\n"
        ),
        ParamType::String => format!(
            "xScoreInput.{name} := dms_App_Get_NumToStr(dmi_App_Get_ScoreVariableValue(\"#{name}\"));\n\
             if(xScoreInput.{name} = \"{MISSING_SENTINEL}\") then\n    \
             xScoreInput.{name} = dms_App_Get_NumToStr({method});\n\
             endif\n"
        ),
    }
}

/// Record the parameter value on the application; strings are logged as numbers.
pub fn audit_logging(param: &FullParameter) -> String {
    let name = &param.name;
    match param.param_type {
        ParamType::Decimal => {
            format!("dmw_App_AddScoreCardVariablesParam2CDA(\"{name}\", xScoreInput.{name});\n")
        }
        ParamType::String => format!(
            "dmw_App_AddScoreCardVariablesParam2CDA(\"{name}\", Val(xScoreInput.{name}));\n"
        ),
    }
}

pub fn glue_header(card: &str) -> String {
    format!(
        "if theApp.CDA_NdScoreModel.Cda_NdScoreModelInputInfo.SCORECARDNAME = \"{card}\" then\n\
         {{\n    \
         _{card}In is a {card}In;\n"
    )
}

/// Assign the engine-side value to the card-side input.
pub fn glue_assignment(card: &str, param: &FullParameter) -> String {
    let source = format!(
        "theApp.CDA_NdScoreModel.Cda_NdScoreModelInputInfo.{}",
        param.name
    );
    let value = match param.param_type {
        ParamType::Decimal => source,
        ParamType::String => format!("portable().toInteger({source})"),
    };
    format!("    _{card}In.{} = {value};\n", param.pmml_name)
}

pub fn glue_trailer(card: &str) -> String {
    format!(
        "    _{card}Out is some {card}Out initially {card}(_{card}In);\n    \
         score = _{card}Out.score;\n    \
         label = _{card}Out.label;\n\
         }}\n"
    )
}

//! Unit tests for the codebook loader, plus the single-tool scenario.

use tooldb_seeder::codebook::Codebook;
use tooldb_seeder::config::GenerateConfig;
use tooldb_seeder::error::PipelineError;
use tooldb_seeder::pipeline::Pipeline;

use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn write_section(dir: &Path, name: &str, content: &str) {
    fs::write(dir.join(format!("{}.csv", name)), content).unwrap();
}

/// A minimal codebook: one manufacturer, one tool (id 7), two retailers.
fn write_single_tool_codebook(dir: &Path) {
    write_section(
        dir,
        "manufacturers",
        "m_id,m_name,country_code,country_name,eu_member,imprint,parent_id,parent_name\n\
         1,Steinmetz Elektrowerkzeuge,276,Germany,1,0,,\n",
    );
    write_section(
        dir,
        "tools",
        "m_id,t_id,t_name_trunc,t_name_full,t_type_code,active,eu_comp,voltage,init_yom\n\
         1,7,SM-CD18,Steinmetz CD18 Cordless Drill,DRL,1,1,18,2016\n",
    );
    write_section(
        dir,
        "retailers",
        "r_id,r_name,country_code,country_name,indep,loc_id,loc_address,loc_zip\n\
         1,Hartley Hardware,840,United States,1,101,4501 Meridian Avenue,98204\n\
         2,ToolBarn,840,United States,0,102,210 Commerce Park Drive,30339\n",
    );
}

#[test]
fn test_embedded_codebook() {
    let codebook = Codebook::embedded().unwrap();
    assert_eq!(codebook.manufacturers.len(), 8);
    assert_eq!(codebook.tools.len(), 24);
    assert_eq!(codebook.retailers.len(), 10);
}

#[test]
fn test_codebook_from_dir() {
    let temp_dir = TempDir::new().unwrap();
    write_single_tool_codebook(temp_dir.path());

    let codebook = Codebook::from_dir(temp_dir.path()).unwrap();
    assert_eq!(codebook.manufacturers.len(), 1);
    assert_eq!(codebook.tools.len(), 1);
    assert_eq!(codebook.retailers.len(), 2);
    assert_eq!(codebook.tools.int_column("t_id").unwrap(), vec![7]);
}

#[test]
fn test_missing_section_is_source_unavailable() {
    let temp_dir = TempDir::new().unwrap();
    write_single_tool_codebook(temp_dir.path());
    fs::remove_file(temp_dir.path().join("retailers.csv")).unwrap();

    let err = Codebook::from_dir(temp_dir.path()).unwrap_err();
    assert!(matches!(err, PipelineError::SourceUnavailable(_)));
}

#[test]
fn test_untypable_field_is_schema_mismatch() {
    let temp_dir = TempDir::new().unwrap();
    write_single_tool_codebook(temp_dir.path());
    write_section(
        temp_dir.path(),
        "retailers",
        "r_id,r_name,country_code,country_name,indep,loc_id,loc_address,loc_zip\n\
         one,Hartley Hardware,840,United States,1,101,4501 Meridian Avenue,98204\n",
    );

    let err = Codebook::from_dir(temp_dir.path()).unwrap_err();
    assert!(matches!(err, PipelineError::SchemaMismatch { .. }));
}

#[test]
fn test_single_tool_scenario() {
    let temp_dir = TempDir::new().unwrap();
    write_single_tool_codebook(temp_dir.path());
    let codebook = Codebook::from_dir(temp_dir.path()).unwrap();

    let config = GenerateConfig {
        orders: 100,
        stock: 50,
        sales: 200,
        ..GenerateConfig::default()
    };
    let data = Pipeline::new(codebook, config.clone()).run().unwrap();

    // Every order is for tool 7 at one generated base price.
    assert_eq!(data.orders.len(), 100);
    let prices = data.orders.decimal_column("r_price").unwrap();
    let base = prices[0];
    assert!(base >= config.base_price.min && base < config.base_price.max);
    for price in &prices {
        assert_eq!(price.to_bits(), base.to_bits());
    }

    // Every inventory row marks tool 7 up strictly inside the band.
    for c_price in data.inventory.decimal_column("c_price").unwrap() {
        assert!(c_price > base * 1.10 - 0.005);
        assert!(c_price < base * 1.40 + 0.005);
        assert!(c_price > base);
    }
}

#![allow(dead_code)]

use std::fs;
use std::path::Path;

use shootingbias::config::DashboardConfig;

pub const SHOOTINGS_HEADER: &str = ",id,name,date,manner_of_death,armed,age,gender,race,city,state,signs_of_mental_illness,threat_level,flee,body_camera,arms_category,latitude,longitude";

// Georgia: 4 incidents, Pennsylvania: 2, Vermont: none.
pub const SHOOTINGS_ROWS: [&str; 6] = [
    "0,3,Alan Able,2015-01-02,shot,gun,53.0,M,White,Atlanta,GA,True,attack,Not fleeing,False,Guns,33.749,-84.388",
    "1,4,Ben Baker,2015-01-03,shot,unarmed,24.0,M,Black,Macon,GA,False,other,Car,False,Unarmed,32.840,-83.632",
    "2,5,\"Carter, Chris\",2015-02-01,shot,gun,31.0,M,Black,Savannah,GA,False,attack,Foot,True,Guns,32.083,-81.099",
    "3,6,Dana Diaz,2015-03-01,shot and Tasered,unknown,,F,Hispanic,Athens,GA,False,undetermined,Not fleeing,False,Unknown,33.960,-83.378",
    "4,7,Evan Eck,2015-04-01,shot,knife,40.0,M,White,Erie,PA,True,attack,Not fleeing,False,Sharp objects,42.129,-80.085",
    "5,8,Finn Ford,2015-05-01,shot,unarmed,19.0,M,Black,Philadelphia,PA,False,other,Foot,True,Unarmed,39.952,-75.165",
];

pub const RACES_CSV: &str = "State,State Code,White,Black,Asian,Hispanic\n\
Georgia,GA,0.5,0.3,0.04,0.1\n\
Pennsylvania,PA,0.76,0.11,0.035,0.07\n\
Vermont,VT,0.93,0.01,0.017,0.02\n";

pub fn geojson(names: &[&str]) -> String {
    let features: Vec<String> = names
        .iter()
        .enumerate()
        .map(|(i, name)| {
            format!(
                r#"{{"type":"Feature","id":"{:02}","properties":{{"name":"{}","density":1.0}},"geometry":{{"type":"Polygon","coordinates":[[[-80,40],[-79,40],[-79,41],[-80,40]]]}}}}"#,
                i + 1,
                name
            )
        })
        .collect();
    format!(
        r#"{{"type":"FeatureCollection","features":[{}]}}"#,
        features.join(",")
    )
}

pub fn write_shootings(dir: &Path, rows: &[&str]) {
    let mut out = String::new();
    out.push_str(SHOOTINGS_HEADER);
    out.push('\n');
    for row in rows {
        out.push_str(row);
        out.push('\n');
    }
    fs::write(dir.join("shootings_with_geocode.csv"), out).unwrap();
}

/// Write the full fixture set into `dir` and return a config pointing at it.
pub fn write_fixture(dir: &Path) -> DashboardConfig {
    write_shootings(dir, &SHOOTINGS_ROWS);
    fs::write(dir.join("races.csv"), RACES_CSV).unwrap();
    fs::write(
        dir.join("state_geodata.json"),
        geojson(&["Georgia", "Pennsylvania", "Vermont"]),
    )
    .unwrap();
    DashboardConfig::default().with_data_dir(dir)
}

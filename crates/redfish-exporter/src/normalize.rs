/*
 * SPDX-FileCopyrightText: Copyright (c) 2026 NVIDIA CORPORATION & AFFILIATES. All rights reserved.
 * SPDX-License-Identifier: Apache-2.0
 *
 * Licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License.
 * You may obtain a copy of the License at
 *
 * http://www.apache.org/licenses/LICENSE-2.0
 *
 * Unless required by applicable law or agreed to in writing, software
 * distributed under the License is distributed on an "AS IS" BASIS,
 * WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
 * See the License for the specific language governing permissions and
 * limitations under the License.
 */

//! Categorical Redfish values mapped onto fixed numeric codes.
//!
//! Every table here is part of the exported metric contract and is copied
//! verbatim into the help text of the metrics that use it. A value outside a
//! table yields `None`, meaning the field is not reported for this scrape.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
    State,
    Health,
    PowerState,
    LinkStatus,
    PortLinkState,
    IntrusionSensor,
    IntrusionSensorReArm,
    SeverityState,
}

impl FieldKind {
    /// Code table as published in metric help strings.
    pub fn codes(self) -> &'static str {
        match self {
            FieldKind::State => {
                "1(Enabled),2(Disabled),3(StandbyOffline),4(StandbySpare),5(InTest),6(Starting),7(Absent),8(UnavailableOffline),9(Deferring),10(Quiesced),11(Updating)"
            }
            FieldKind::Health | FieldKind::SeverityState => "1(OK),2(Warning),3(Critical)",
            FieldKind::PowerState => "1(On),2(Off),3(PoweringOn),4(PoweringOff)",
            FieldKind::LinkStatus => "1(LinkUp),2(NoLink),3(LinkDown)",
            FieldKind::PortLinkState => "1(Up),0(Down)",
            FieldKind::IntrusionSensor => "1(Normal),2(TamperingDetected),3(HardwareIntrusion)",
            FieldKind::IntrusionSensorReArm => "1(Manual),2(Automatic)",
        }
    }
}

pub fn normalize(kind: FieldKind, raw: &str) -> Option<f64> {
    let code = match kind {
        FieldKind::State => match raw {
            "Enabled" => 1.0,
            "Disabled" => 2.0,
            "StandbyOffline" => 3.0,
            "StandbySpare" => 4.0,
            "InTest" => 5.0,
            "Starting" => 6.0,
            "Absent" => 7.0,
            "UnavailableOffline" => 8.0,
            "Deferring" => 9.0,
            "Quiesced" => 10.0,
            "Updating" => 11.0,
            _ => return None,
        },
        FieldKind::Health | FieldKind::SeverityState => match raw {
            "OK" => 1.0,
            "Warning" => 2.0,
            "Critical" => 3.0,
            _ => return None,
        },
        FieldKind::PowerState => match raw {
            "On" => 1.0,
            "Off" => 2.0,
            "PoweringOn" => 3.0,
            "PoweringOff" => 4.0,
            _ => return None,
        },
        FieldKind::LinkStatus => match raw {
            "LinkUp" => 1.0,
            "NoLink" => 2.0,
            "LinkDown" => 3.0,
            _ => return None,
        },
        FieldKind::PortLinkState => match raw {
            "Up" => 1.0,
            "Down" => 0.0,
            _ => return None,
        },
        FieldKind::IntrusionSensor => match raw {
            "Normal" => 1.0,
            "TamperingDetected" => 2.0,
            "HardwareIntrusion" => 3.0,
            _ => return None,
        },
        FieldKind::IntrusionSensorReArm => match raw {
            "Manual" => 1.0,
            "Automatic" => 2.0,
            _ => return None,
        },
    };
    Some(code)
}

/// Booleans are reported as 1/0; an absent flag is not reported.
pub fn flag(value: Option<bool>) -> Option<f64> {
    value.map(|v| if v { 1.0 } else { 0.0 })
}
